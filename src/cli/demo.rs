use crate::cli::open_store;
use crate::error::{PennyError, Result};
use crate::expenses::create_expense;
use crate::models::ExpenseInput;
use crate::{categories, subcategories};

// (amount_cents, days_ago, category, subcategory, note)
const SAMPLE_EXPENSES: &[(i64, i64, &str, Option<&str>, &str)] = &[
    (8450, 2, "Food & Dining", Some("Groceries"), "Weekly groceries"),
    (1275, 2, "Food & Dining", Some("Coffee"), "Espresso beans"),
    (3200, 5, "Food & Dining", Some("Restaurants"), "Dinner out"),
    (5500, 6, "Transportation", Some("Fuel"), "Tank of gas"),
    (290, 8, "Transportation", Some("Public Transit"), "Bus fare"),
    (12999, 12, "Shopping", Some("Electronics"), "Mechanical keyboard"),
    (1599, 14, "Entertainment", Some("Subscriptions"), "Streaming"),
    (7800, 18, "Bills & Utilities", Some("Electricity"), "Power bill"),
    (4500, 20, "Bills & Utilities", Some("Internet"), "Fiber"),
    (2350, 25, "Health & Medical", Some("Pharmacy"), "Prescriptions"),
    (999, 33, "Education", Some("Books"), "Paperback"),
    (6000, 40, "Personal Care", Some("Haircut"), "Haircut"),
];

pub fn run() -> Result<()> {
    let store = open_store()?;
    let today = chrono::Local::now().date_naive();

    let inserted = store.with(|conn| {
        // Load the whole sample set or none of it.
        let tx = conn.unchecked_transaction()?;
        let mut inserted = 0;
        for (amount_cents, days_ago, category, subcategory, note) in SAMPLE_EXPENSES {
            let category_id = categories::find_category_by_name(&tx, category)?
                .map(|c| c.id)
                .ok_or_else(|| PennyError::Validation(format!("Unknown category: {category}")))?;
            let subcategory_id = subcategory
                .map(|name| {
                    subcategories::list_by_category(&tx, category_id)?
                        .into_iter()
                        .find(|s| s.name == name)
                        .map(|s| s.id)
                        .ok_or_else(|| {
                            PennyError::Validation(format!("Unknown subcategory: {name}"))
                        })
                })
                .transpose()?;
            let date = today - chrono::Duration::days(*days_ago);
            create_expense(
                &tx,
                &ExpenseInput {
                    amount_cents: *amount_cents,
                    date: date.to_string(),
                    category_id,
                    subcategory_id,
                    description: Some(note.to_string()),
                },
            )?;
            inserted += 1;
        }
        tx.commit()?;
        Ok(inserted)
    })?;

    println!("Loaded {inserted} sample expenses.");
    println!("Try `penny report month` or `penny report cycle --start-day 25`.");
    Ok(())
}
