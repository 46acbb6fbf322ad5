//! Flatten a page record into export rows

use shared_types::{PageRecord, Row};

/// One row per repair order number, in page order then order of appearance.
///
/// A Bates number without repair orders still yields a single row with an
/// empty repair order so it is not dropped from the index.
pub fn normalize_rows(record: &PageRecord) -> Vec<Row> {
    let mut rows = Vec::new();

    for (page_number, entry) in record.iter() {
        if entry.repair_orders.is_empty() {
            rows.push(Row {
                page_number,
                bate_number: entry.bate_number.clone(),
                repair_order_number: Row::NO_REFERENCE.to_string(),
            });
            continue;
        }

        rows.extend(entry.repair_orders.iter().map(|ro| Row {
            page_number,
            bate_number: entry.bate_number.clone(),
            repair_order_number: ro.clone(),
        }));
    }

    rows
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use shared_types::PageEntry;

    proptest! {
        /// Property: N references give N rows, zero references give exactly one
        #[test]
        fn row_count_matches_references(
            pages in prop::collection::btree_map(
                1u32..500,
                prop::collection::vec("[0-9]{5}", 0..6),
                0..20
            )
        ) {
            let mut record = PageRecord::new();
            for (page, refs) in &pages {
                record.insert(*page, PageEntry::new(format!("AARON{:08}", page), refs.clone()));
            }

            let rows = normalize_rows(&record);
            let expected: usize = pages.values().map(|refs| refs.len().max(1)).sum();
            prop_assert_eq!(rows.len(), expected);

            for (page, refs) in &pages {
                let page_rows: Vec<_> = rows.iter().filter(|r| r.page_number == *page).collect();
                let expected_bates = format!("AARON{:08}", page);
                prop_assert!(page_rows.iter().all(|r| r.bate_number == expected_bates));
                if refs.is_empty() {
                    prop_assert_eq!(page_rows.len(), 1);
                    prop_assert_eq!(page_rows[0].repair_order_number.as_str(), "");
                } else {
                    let got: Vec<_> = page_rows.iter().map(|r| r.repair_order_number.clone()).collect();
                    prop_assert_eq!(&got, refs);
                }
            }

            let page_numbers: Vec<_> = rows.iter().map(|r| r.page_number).collect();
            let mut sorted = page_numbers.clone();
            sorted.sort();
            prop_assert_eq!(page_numbers, sorted);
        }
    }
}
