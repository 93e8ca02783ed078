use crate::schema::EntitySchema;

/// Items whose designated fields contain `term`, ignoring case.
///
/// An empty term keeps every item. Order is preserved and `items` is never
/// modified.
pub fn filter_items<S: EntitySchema>(items: &[S::Entity], term: &str) -> Vec<S::Entity> {
    if term.is_empty() {
        return items.to_vec();
    }

    let needle = term.to_lowercase();
    items
        .iter()
        .filter(|item| {
            S::search_fields(item)
                .into_iter()
                .flatten()
                .any(|field| !field.is_empty() && field.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}
