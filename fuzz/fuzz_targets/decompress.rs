#![no_main]
#[macro_use] extern crate libfuzzer_sys;
extern crate ruhuff;

fuzz_target!(|data: &[u8]| {
    // arbitrary input must produce an error, never a panic
    _ = ruhuff::decompress(data);
    _ = ruhuff::decompress_raw(data, data.first().copied().unwrap_or(0) as usize, 64);
});
