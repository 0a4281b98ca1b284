use crate::path::Path;
use crate::value::Value;

use super::{EditOp, Patch};

/// Computes the edit script that turns `base` into `edited`.
///
/// Mapping entries are matched by key and sequence elements by index. Keys
/// present only in `edited` become `add`s and keys present only in `base`
/// become `remove`s. A surplus sequence tail is added in ascending index order
/// or removed in descending index order, so every op stays valid when replayed
/// in sequence. Any other difference is a `replace` of the whole node.
pub fn diff(base: &Value, edited: &Value) -> Patch {
    let mut patch = Patch::new();
    diff_node(base, edited, &Path::root(), &mut patch);
    patch
}

fn diff_node(base: &Value, edited: &Value, path: &Path, patch: &mut Patch) {
    match (base, edited) {
        (Value::Mapping(old), Value::Mapping(new)) => {
            for (key, old_value) in old {
                let child = path.push_field(key.as_str());
                match new.get(key) {
                    Some(new_value) => diff_node(old_value, new_value, &child, patch),
                    None => patch.push(EditOp::remove(child)),
                }
            }
            for (key, new_value) in new {
                if !old.contains_key(key) {
                    patch.push(EditOp::add(path.push_field(key.as_str()), new_value.clone()));
                }
            }
        }
        (Value::Sequence(old), Value::Sequence(new)) => {
            for (index, (old_item, new_item)) in old.iter().zip(new).enumerate() {
                diff_node(old_item, new_item, &path.push_index(index), patch);
            }
            for (index, new_item) in new.iter().enumerate().skip(old.len()) {
                patch.push(EditOp::add(path.push_index(index), new_item.clone()));
            }
            for index in (new.len()..old.len()).rev() {
                patch.push(EditOp::remove(path.push_index(index)));
            }
        }
        _ if base == edited => {}
        _ => patch.push(EditOp::replace(path.clone(), edited.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parse;

    fn ops(base: &str, edited: &str) -> Vec<EditOp> {
        diff(&parse(base).unwrap(), &parse(edited).unwrap())
            .into_iter()
            .collect()
    }

    #[test]
    fn test_single_replace() {
        assert_eq!(
            ops("title: A\ncontent: X\n", "title: B\ncontent: X\n"),
            vec![EditOp::replace(Path::from_field("title"), "B")]
        );
    }

    #[test]
    fn test_identical_documents() {
        assert!(ops("a: [1, {b: .nan}]\n", "a: [1, {b: .nan}]\n").is_empty());
        assert!(ops("a: 1\nb: 2\n", "b: 2\na: 1\n").is_empty());
    }

    #[test]
    fn test_keys_added_and_removed() {
        assert_eq!(
            ops("a: 1\nb: 2\n", "b: 2\nc: 3\n"),
            vec![
                EditOp::remove(Path::from_field("a")),
                EditOp::add(Path::from_field("c"), 3i64),
            ]
        );
    }

    #[test]
    fn test_sequence_tails() {
        let tags = Path::from_field("tags");
        assert_eq!(
            ops("tags: [a]\n", "tags: [a, b, c]\n"),
            vec![
                EditOp::add(tags.push_index(1), "b"),
                EditOp::add(tags.push_index(2), "c"),
            ]
        );
        assert_eq!(
            ops("tags: [a, b, c]\n", "tags: [x]\n"),
            vec![
                EditOp::replace(tags.push_index(0), "x"),
                EditOp::remove(tags.push_index(2)),
                EditOp::remove(tags.push_index(1)),
            ]
        );
    }

    #[test]
    fn test_type_change_replaces_whole_node() {
        assert_eq!(
            ops("a: 1\n", "a: 1.0\n"),
            vec![EditOp::replace(Path::from_field("a"), 1.0f64)]
        );
        assert_eq!(
            ops("a: {x: 1}\n", "a: [1]\n"),
            vec![EditOp::replace(
                Path::from_field("a"),
                Value::Sequence(vec![Value::from(1i64)])
            )]
        );
        assert_eq!(
            ops("plain\n", "- item\n"),
            vec![EditOp::replace(
                Path::root(),
                Value::Sequence(vec![Value::from("item")])
            )]
        );
    }

    #[test]
    fn test_nested_paths() {
        assert_eq!(
            ops(
                "users:\n  - name: a\n    mail: x\n",
                "users:\n  - name: a\n    mail: y\n"
            ),
            vec![EditOp::replace(
                Path::from_field("users").push_index(0).push_field("mail"),
                "y"
            )]
        );
    }
}
