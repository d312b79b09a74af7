#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(table) = dbase_raw::Table::new(data) else {
        return;
    };
    if let Ok(columns) = table.all_columns() {
        for column in &columns {
            assert_eq!(column.len(), table.num_records());
            assert_eq!(column.as_bytes().len(), column.len() * column.width());
            let _ = column.numerics();
            let _ = column.dates();
            let _ = column.timestamps();
        }
    }
    let _ = table.deletion_flags();
});
