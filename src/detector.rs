use crate::models::Offer;
use std::collections::HashSet;

/// Offers from `current` that are new and qualify, in `current` order.
///
/// New means the id is not among `previous`; qualifying means more than
/// `threshold` nights. Within `current` the first occurrence of an id is the
/// one judged; later repeats are ignored.
pub fn detect_new(current: &[Offer], previous: &[Offer], threshold: u32) -> Vec<Offer> {
    let mut seen: HashSet<&str> = previous.iter().map(|o| o.id.as_str()).collect();

    current
        .iter()
        .filter(|&offer| seen.insert(offer.id.as_str()))
        .filter(|offer| offer.qualifies(threshold))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn offer(id: &str, nights: Option<u32>) -> Offer {
        Offer {
            id: id.to_string(),
            origin: None,
            destination: None,
            nights,
            dates: None,
            link: format!("https://www.imoova.com/en/relocations/{}", id),
        }
    }

    #[test]
    fn test_threshold_boundary() {
        let current = vec![offer("a", Some(3)), offer("b", Some(4)), offer("c", None)];
        assert_eq!(detect_new(&current, &[], 3), vec![offer("b", Some(4))]);
    }

    #[test]
    fn test_known_id_is_never_new() {
        let previous = vec![offer("1", Some(5))];
        let mut changed = offer("1", Some(12));
        changed.origin = Some("Somewhere else".to_string());

        assert!(detect_new(&[changed], &previous, 3).is_empty());
    }

    #[test]
    fn test_known_unqualified_ids_still_count_as_seen() {
        let previous = vec![offer("2", Some(1))];
        assert!(detect_new(&[offer("2", Some(8))], &previous, 3).is_empty());
    }

    #[test]
    fn test_order_follows_current_batch() {
        let current = vec![offer("9", Some(5)), offer("4", Some(2)), offer("5", Some(7))];
        let ids: Vec<String> = detect_new(&current, &[], 3)
            .into_iter()
            .map(|o| o.id)
            .collect();
        assert_eq!(ids, vec!["9".to_string(), "5".to_string()]);
    }

    #[test]
    fn test_duplicates_in_batch_reported_once() {
        let mut second = offer("6", Some(10));
        second.dates = Some("later".to_string());
        let current = vec![offer("6", Some(5)), second];

        assert_eq!(detect_new(&current, &[], 3), vec![offer("6", Some(5))]);

        let current = vec![offer("8", Some(1)), offer("8", Some(9))];
        assert!(detect_new(&current, &[], 3).is_empty());
    }

    #[test]
    fn test_same_inputs_same_result() {
        let previous = vec![offer("1", Some(5))];
        let current = vec![offer("1", Some(5)), offer("2", Some(2)), offer("3", Some(6))];

        let first = detect_new(&current, &previous, 3);
        let second = detect_new(&current, &previous, 3);
        assert_eq!(first, second);
        assert_eq!(first, vec![offer("3", Some(6))]);
    }
}
