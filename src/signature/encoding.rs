//! RFC 3986 percent-encoding rules used by base strings, headers, and query placement.

// crates.io
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

/// Everything except the RFC 3986 unreserved set (`ALPHA / DIGIT / "-" / "." / "_" / "~"`).
const RFC3986: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// Percent-encodes a value per RFC 5849 §3.6 (UTF-8, uppercase hex, unreserved kept).
pub fn encode(value: &str) -> String {
	utf8_percent_encode(value, RFC3986).to_string()
}

/// Reverses [`encode`]; invalid escapes and invalid UTF-8 are kept lossily.
pub fn decode(value: &str) -> String {
	percent_decode_str(value).decode_utf8_lossy().into_owned()
}

/// Decodes a value taken from an `application/x-www-form-urlencoded` payload or URI query,
/// where `+` stands for a space.
pub fn decode_form(value: &str) -> String {
	if value.contains('+') { decode(&value.replace('+', " ")) } else { decode(value) }
}

/// Re-encodes a wire-form value into its canonical percent-encoded shape.
///
/// Applying the function twice yields the same result as applying it once.
pub fn canonicalize(raw: &str) -> String {
	encode(&decode_form(raw))
}

/// Renders a value as an `auth-param` quoted string for the `Authorization` header.
///
/// Percent-encoded values never contain `"` or `\`; the escaping only matters for values
/// such as `realm` that are emitted verbatim.
pub fn quote_header_value(value: &str) -> String {
	let mut quoted = String::with_capacity(value.len() + 2);

	quoted.push('"');

	for ch in value.chars() {
		if matches!(ch, '"' | '\\') {
			quoted.push('\\');
		}

		quoted.push(ch);
	}

	quoted.push('"');

	quoted
}

/// Splits a raw `a=b&c=d` payload into undecoded key/value pairs.
pub fn split_pairs(raw: &str) -> Vec<(String, String)> {
	raw.split('&')
		.filter(|segment| !segment.is_empty())
		.map(|segment| match segment.split_once('=') {
			Some((key, value)) => (key.to_owned(), value.to_owned()),
			None => (segment.to_owned(), String::new()),
		})
		.collect()
}

/// Joins already-encoded pairs with `=` and `&`.
pub fn join_pairs<'a, I>(pairs: I) -> String
where
	I: IntoIterator<Item = (&'a str, &'a str)>,
{
	let mut buf = String::new();

	for (idx, (key, value)) in pairs.into_iter().enumerate() {
		if idx > 0 {
			buf.push('&');
		}

		buf.push_str(key);
		buf.push('=');
		buf.push_str(value);
	}

	buf
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn encodes_reserved_characters_with_uppercase_hex() {
		assert_eq!(encode("Ladies + Gentlemen"), "Ladies%20%2B%20Gentlemen");
		assert_eq!(encode("An encoded string!"), "An%20encoded%20string%21");
		assert_eq!(encode("Dogs, Cats & Mice"), "Dogs%2C%20Cats%20%26%20Mice");
		assert_eq!(encode("☃"), "%E2%98%83");
		assert_eq!(encode("-._~"), "-._~");
	}

	#[test]
	fn round_trips_printable_ascii_and_reserved_characters() {
		let printable: String = (0x20_u8..0x7f).map(char::from).collect();

		for sample in [
			printable.as_str(),
			":/?#[]@!$&'()*+,;=",
			"%",
			"100%25 done",
			"ünïcödé ☃",
			"",
		] {
			assert_eq!(decode(&encode(sample)), sample, "Round trip failed for {sample:?}.");
		}
	}

	#[test]
	fn canonicalization_is_idempotent() {
		for raw in ["r%20b", "2+q", "%3D%253D", "c%40", "plain", "a%2bb"] {
			let once = canonicalize(raw);

			assert_eq!(canonicalize(&once), once, "Canonicalization drifted for {raw:?}.");
		}

		assert_eq!(canonicalize("2+q"), "2%20q");
		assert_eq!(canonicalize("%3D%253D"), "%3D%253D");
		assert_eq!(canonicalize("a%2bb"), "a%2Bb");
	}

	#[test]
	fn header_values_are_quoted_and_escaped() {
		assert_eq!(quote_header_value("Example"), "\"Example\"");
		assert_eq!(quote_header_value("say \"hi\"\\"), "\"say \\\"hi\\\"\\\\\"");
	}

	#[test]
	fn split_pairs_keeps_raw_encoding() {
		assert_eq!(
			split_pairs("b5=%3D%253D&a3=a&&c%40=&c2"),
			vec![
				("b5".to_owned(), "%3D%253D".to_owned()),
				("a3".to_owned(), "a".to_owned()),
				("c%40".to_owned(), String::new()),
				("c2".to_owned(), String::new()),
			]
		);
		assert_eq!(join_pairs([("a", "1"), ("b", "")]), "a=1&b=");
	}
}
