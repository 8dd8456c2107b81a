#![no_main]
use libfuzzer_sys::fuzz_target;
use rawvol::FilePattern;

fuzz_target!(|data: &[u8]| {
    if let Ok(template) = std::str::from_utf8(data) {
        if let Ok(pattern) = FilePattern::new(template) {
            let pattern = pattern.prefix("prefix").slice_offset(-3).slice_spacing(7);
            let _ = pattern.file_name(0);
            let _ = pattern.file_name(i32::MAX);
            let _ = pattern.file_name(i32::MIN);
            let _ = pattern.path(42);
        }
    }
});
