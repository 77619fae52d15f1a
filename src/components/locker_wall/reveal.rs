//! Progressive label reveal: connector length buys label characters.

/// Path length at which a label is shown in full.
pub const REVEAL_THRESHOLD: f64 = 280.0;

/// Number of characters of `label` revealed at `distance` pixels.
pub fn revealed_chars(label: &str, distance: f64) -> usize {
	let total = label.chars().count();
	let ratio = (distance / REVEAL_THRESHOLD).clamp(0.0, 1.0);
	((total as f64) * ratio).round() as usize
}

/// Prefix of `label` proportional to `distance`, truncated on char
/// boundaries so non-ASCII labels stay intact.
pub fn revealed_prefix(label: &str, distance: f64) -> String {
	label.chars().take(revealed_chars(label, distance)).collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn full_label_at_and_past_threshold() {
		assert_eq!(revealed_prefix("stadhouder", REVEAL_THRESHOLD), "stadhouder");
		assert_eq!(revealed_prefix("stadhouder", 10_000.0), "stadhouder");
	}

	#[test]
	fn short_connectors_reveal_a_fragment() {
		let label = "collection exchange";
		let half = revealed_prefix(label, REVEAL_THRESHOLD / 2.0);
		assert!(half.chars().count() < label.chars().count());
		assert!(label.starts_with(&half));
	}

	#[test]
	fn reveal_is_monotone_in_distance() {
		let label = "loaned masterworks";
		let mut prev = String::new();
		for step in 0..=28 {
			let d = step as f64 * 10.0;
			let cur = revealed_prefix(label, d);
			assert!(
				cur.starts_with(&prev),
				"reveal at {d} lost characters: {prev:?} -> {cur:?}"
			);
			prev = cur;
		}
		assert_eq!(prev, label);
	}

	#[test]
	fn multibyte_labels_truncate_on_char_boundaries() {
		let label = "황금시대 네트워크";
		let partial = revealed_prefix(label, 100.0);
		assert!(label.starts_with(&partial));
		assert_eq!(revealed_prefix(label, 0.0), "");
	}
}
