#[derive(Debug, Clone)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub is_default: bool,
}

#[derive(Debug, Clone)]
pub struct Subcategory {
    pub id: i64,
    pub category_id: i64,
    pub name: String,
}

/// A bare expenses row, exactly as stored.
#[derive(Debug, Clone)]
pub struct ExpenseRecord {
    pub id: i64,
    pub amount_cents: i64,
    pub date: String,
    pub category_id: i64,
    pub subcategory_id: Option<i64>,
    pub description: Option<String>,
}

/// An expense joined with its category and (optional) subcategory names.
/// Kept separate from `ExpenseRecord` so the two query shapes can't be
/// confused.
#[derive(Debug, Clone)]
pub struct ExpenseWithCategory {
    pub id: i64,
    pub amount_cents: i64,
    pub date: String,
    pub category_id: i64,
    pub category_name: String,
    pub category_icon: Option<String>,
    pub category_color: Option<String>,
    pub subcategory_id: Option<i64>,
    pub subcategory_name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ExpenseInput {
    pub amount_cents: i64,
    pub date: String,
    pub category_id: i64,
    pub subcategory_id: Option<i64>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ExpenseFilters {
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub category_id: Option<i64>,
    pub subcategory_id: Option<i64>,
    pub search: Option<String>,
}
