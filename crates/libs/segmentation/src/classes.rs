/// DeepFashion2 garment categories, in model output order.
pub const CLASS_NAMES: [&str; 13] = [
    "short_sleeved_shirt",
    "long_sleeved_shirt",
    "short_sleeved_outwear",
    "long_sleeved_outwear",
    "vest",
    "sling",
    "shorts",
    "trousers",
    "skirt",
    "short_sleeved_dress",
    "long_sleeved_dress",
    "vest_dress",
    "sling_dress",
];

/// Class name for a model class id, or `"unknown"` for out-of-range ids.
pub fn class_name(class_id: usize) -> &'static str {
    CLASS_NAMES.get(class_id).copied().unwrap_or("unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_ids_map_to_names() {
        assert_eq!(class_name(0), "short_sleeved_shirt");
        assert_eq!(class_name(7), "trousers");
        assert_eq!(class_name(12), "sling_dress");
    }

    #[test]
    fn out_of_range_id_is_unknown() {
        assert_eq!(class_name(13), "unknown");
        assert_eq!(class_name(usize::MAX), "unknown");
    }
}
