//! Applies quickfix patches to declaration documents.

use serde_json::Value;

use crate::diagnostics::PatchOp;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct PatchError {
    pub message: String,
}

impl PatchError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Applies `ops` in order. A failing op leaves earlier ops applied.
pub fn apply_patch(doc: &mut Value, ops: &[PatchOp]) -> Result<(), PatchError> {
    for op in ops {
        match op {
            PatchOp::Add { path, value } => add(doc, path, value.clone())?,
            PatchOp::Remove { path } => remove(doc, path)?,
            PatchOp::Replace { path, value } => replace(doc, path, value.clone())?,
            PatchOp::Test { path, value } => {
                let cur = lookup(doc, path)?;
                if cur != value {
                    return Err(PatchError::new(format!(
                        "test failed at {path:?}: expected {value} got {cur}"
                    )));
                }
            }
        }
    }
    Ok(())
}

fn tokens(ptr: &str) -> Result<Vec<String>, PatchError> {
    if ptr.is_empty() {
        return Ok(Vec::new());
    }
    let Some(rest) = ptr.strip_prefix('/') else {
        return Err(PatchError::new(format!(
            "invalid JSON Pointer (must start with '/' or be empty): {ptr:?}"
        )));
    };
    Ok(rest
        .split('/')
        .map(|t| t.replace("~1", "/").replace("~0", "~"))
        .collect())
}

fn step<'a>(cur: &'a Value, tok: &str, ptr: &str) -> Result<&'a Value, PatchError> {
    let next = match cur {
        Value::Object(m) => m.get(tok),
        Value::Array(a) => a.get(index(tok, ptr)?),
        _ => None,
    };
    next.ok_or_else(|| PatchError::new(format!("path not found: {ptr:?}")))
}

fn step_mut<'a>(cur: &'a mut Value, tok: &str, ptr: &str) -> Result<&'a mut Value, PatchError> {
    let next = match cur {
        Value::Object(m) => m.get_mut(tok),
        Value::Array(a) => {
            let idx = index(tok, ptr)?;
            a.get_mut(idx)
        }
        _ => None,
    };
    next.ok_or_else(|| PatchError::new(format!("path not found: {ptr:?}")))
}

fn index(tok: &str, ptr: &str) -> Result<usize, PatchError> {
    tok.parse::<usize>().map_err(|_| {
        PatchError::new(format!(
            "expected array index in pointer {ptr:?}, got {tok:?}"
        ))
    })
}

fn lookup<'a>(doc: &'a Value, ptr: &str) -> Result<&'a Value, PatchError> {
    tokens(ptr)?
        .iter()
        .try_fold(doc, |cur, tok| step(cur, tok, ptr))
}

/// The container holding the target of `ptr`, plus the target's key.
fn parent_mut<'a>(doc: &'a mut Value, ptr: &str) -> Result<(&'a mut Value, String), PatchError> {
    let mut toks = tokens(ptr)?;
    let Some(last) = toks.pop() else {
        return Err(PatchError::new(format!(
            "operation needs a non-root pointer, got {ptr:?}"
        )));
    };
    let mut cur = doc;
    for tok in &toks {
        cur = step_mut(cur, tok, ptr)?;
    }
    Ok((cur, last))
}

fn add(doc: &mut Value, ptr: &str, value: Value) -> Result<(), PatchError> {
    if ptr.is_empty() {
        *doc = value;
        return Ok(());
    }
    let (parent, key) = parent_mut(doc, ptr)?;
    match parent {
        Value::Object(m) => {
            m.insert(key, value);
            Ok(())
        }
        Value::Array(a) if key == "-" => {
            a.push(value);
            Ok(())
        }
        Value::Array(a) => {
            let idx = index(&key, ptr)?;
            if idx > a.len() {
                return Err(PatchError::new(format!(
                    "array index out of bounds for add at {ptr:?}: {idx}"
                )));
            }
            a.insert(idx, value);
            Ok(())
        }
        _ => Err(PatchError::new(format!(
            "add parent is not a container at {ptr:?}"
        ))),
    }
}

fn replace(doc: &mut Value, ptr: &str, value: Value) -> Result<(), PatchError> {
    if ptr.is_empty() {
        *doc = value;
        return Ok(());
    }
    let (parent, key) = parent_mut(doc, ptr)?;
    let slot = step_mut(parent, &key, ptr)?;
    *slot = value;
    Ok(())
}

fn remove(doc: &mut Value, ptr: &str) -> Result<(), PatchError> {
    if ptr.is_empty() {
        return Err(PatchError::new("cannot remove the document root"));
    }
    let (parent, key) = parent_mut(doc, ptr)?;
    let removed = match parent {
        Value::Object(m) => m.remove(&key).is_some(),
        Value::Array(a) => {
            let idx = index(&key, ptr)?;
            if idx < a.len() {
                a.remove(idx);
                true
            } else {
                false
            }
        }
        _ => false,
    };
    if removed {
        Ok(())
    } else {
        Err(PatchError::new(format!("remove path not found: {ptr:?}")))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{apply_patch, PatchOp};

    #[test]
    fn add_replace_remove_on_decl_shaped_docs() {
        let mut doc = json!({
            "containers": [{"name": "C", "methods": [{"name": "M", "body": "x"}]}]
        });
        let ops = vec![
            PatchOp::Add {
                path: "/containers/0/partial".to_string(),
                value: json!(true),
            },
            PatchOp::Remove {
                path: "/containers/0/methods/0/body".to_string(),
            },
            PatchOp::Replace {
                path: "/containers/0/name".to_string(),
                value: json!("D"),
            },
        ];
        apply_patch(&mut doc, &ops).expect("apply patch");
        assert_eq!(
            doc,
            json!({"containers": [{"name": "D", "partial": true, "methods": [{"name": "M"}]}]})
        );
    }

    #[test]
    fn pointer_escapes_and_append() {
        let mut doc = json!({"a/b": {"~": 1}, "arr": [1]});
        apply_patch(
            &mut doc,
            &[
                PatchOp::Replace {
                    path: "/a~1b/~0".to_string(),
                    value: json!(7),
                },
                PatchOp::Add {
                    path: "/arr/-".to_string(),
                    value: json!(2),
                },
            ],
        )
        .expect("apply patch");
        assert_eq!(doc, json!({"a/b": {"~": 7}, "arr": [1, 2]}));
    }

    #[test]
    fn failures_are_reported() {
        let mut doc = json!({"a": 1});
        let err = apply_patch(
            &mut doc,
            &[PatchOp::Test {
                path: "/a".to_string(),
                value: json!(2),
            }],
        )
        .expect_err("test op must fail");
        assert!(err.message.contains("test failed"), "{err}");

        let err = apply_patch(
            &mut doc,
            &[PatchOp::Remove {
                path: "a".to_string(),
            }],
        )
        .expect_err("invalid pointer");
        assert!(err.message.contains("invalid JSON Pointer"), "{err}");

        let err = apply_patch(
            &mut doc,
            &[PatchOp::Replace {
                path: "/missing".to_string(),
                value: json!(0),
            }],
        )
        .expect_err("replace needs an existing target");
        assert!(err.message.contains("path not found"), "{err}");

        let err = apply_patch(
            &mut doc,
            &[PatchOp::Remove {
                path: String::new(),
            }],
        )
        .expect_err("root removal");
        assert_eq!(err.message, "cannot remove the document root");
    }
}
