//! Nested request parameters flattened into bracketed key paths.
//!
//! Form bodies and query strings sometimes carry structured values (`filter[tags][0]=a`).
//! [`ParamTree`] models those values explicitly and [`flatten_params`] walks the tree
//! depth-first, emitting one `(key_path, value)` pair per leaf. Encoding happens later,
//! once per pair, so the order of encoding is never mixed with the traversal.

// self
use crate::_prelude::*;

/// A parameter value that may nest lists and maps.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamTree {
	/// Scalar value.
	Leaf(String),
	/// Positional children rendered as `key[0]`, `key[1]`, ...
	List(Vec<ParamTree>),
	/// Named children rendered as `key[name]`.
	Map(BTreeMap<String, ParamTree>),
}
impl From<&str> for ParamTree {
	fn from(value: &str) -> Self {
		Self::Leaf(value.to_owned())
	}
}
impl From<String> for ParamTree {
	fn from(value: String) -> Self {
		Self::Leaf(value)
	}
}
impl<T> From<Vec<T>> for ParamTree
where
	T: Into<ParamTree>,
{
	fn from(values: Vec<T>) -> Self {
		Self::List(values.into_iter().map(Into::into).collect())
	}
}

/// Flattens top-level parameters into unencoded `(key_path, value)` pairs.
///
/// Map entries are visited in key order and list entries in position order. Empty lists
/// and maps produce no pairs.
pub fn flatten_params(params: &BTreeMap<String, ParamTree>) -> Vec<(String, String)> {
	let mut out = Vec::new();

	for (key, tree) in params {
		flatten_into(key.clone(), tree, &mut out);
	}

	out
}

fn flatten_into(path: String, tree: &ParamTree, out: &mut Vec<(String, String)>) {
	match tree {
		ParamTree::Leaf(value) => out.push((path, value.clone())),
		ParamTree::List(children) =>
			for (idx, child) in children.iter().enumerate() {
				flatten_into(format!("{path}[{idx}]"), child, out);
			},
		ParamTree::Map(children) =>
			for (name, child) in children {
				flatten_into(format!("{path}[{name}]"), child, out);
			},
	}
}
