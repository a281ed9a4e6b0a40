#![no_main]

use folio_layout::{PageConfig, PageLayout};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(config) = serde_json::from_slice::<PageConfig>(data) else {
        return;
    };
    let Ok(page) = PageLayout::from_config(config) else {
        return;
    };

    // Anything that validates must resolve and re-export losslessly.
    let _ = page.layout();
    let again = PageLayout::from_config(page.to_config()).expect("re-export is valid");
    assert_eq!(again, page);
});
