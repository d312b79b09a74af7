#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = dbase_raw::Table::new(data);
    let options = dbase_raw::ReadingOptions::default()
        .descriptor_check(dbase_raw::DescriptorCheck::Lenient)
        .version_check(dbase_raw::VersionCheck::AcceptMemoVariants);
    let _ = dbase_raw::Table::with_options(data, options);
});
