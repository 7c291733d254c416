//! Human-readable and JSON rendering of stored objects (`cat-file -p`).

use serde_json::{json, Value};
use twig_store::{Commit, Object, ObjectStore, StoreResult, Tree};
use twig_types::{ObjectId, Signature};

/// Render the object stored under `id`.
pub fn render(store: &dyn ObjectStore, id: &ObjectId) -> StoreResult<String> {
    Ok(render_object(&store.get(id)?))
}

/// Render a decoded object.
///
/// - blob: content, lossily decoded as UTF-8
/// - tree: `<mode> <kind> <id>\t<name>` per entry
/// - commit: header lines, a blank line, then the message
pub fn render_object(object: &Object) -> String {
    match object {
        Object::Blob(blob) => blob.text(),
        Object::Tree(tree) => render_tree(tree),
        Object::Commit(commit) => String::from_utf8_lossy(&commit.encode_body()).into_owned(),
    }
}

fn render_tree(tree: &Tree) -> String {
    tree.entries()
        .iter()
        .map(|e| format!("{} {} {}\t{}\n", e.mode, e.kind(), e.object_id, e.name))
        .collect()
}

/// Structured form of the object stored under `id`.
pub fn render_json(store: &dyn ObjectStore, id: &ObjectId) -> StoreResult<Value> {
    let mut value = object_json(&store.get(id)?);
    value["id"] = json!(id.to_hex());
    Ok(value)
}

fn object_json(object: &Object) -> Value {
    match object {
        Object::Blob(blob) => json!({
            "type": "blob",
            "size": blob.data.len(),
            "content": blob.text(),
        }),
        Object::Tree(tree) => json!({
            "type": "tree",
            "entries": tree.entries().iter().map(|e| json!({
                "mode": e.mode.to_string(),
                "kind": e.kind().as_str(),
                "id": e.object_id.to_hex(),
                "name": e.name,
            })).collect::<Vec<_>>(),
        }),
        Object::Commit(commit) => commit_json(commit),
    }
}

fn commit_json(commit: &Commit) -> Value {
    json!({
        "type": "commit",
        "tree": commit.tree.to_hex(),
        "parents": commit.parents.iter().map(ObjectId::to_hex).collect::<Vec<_>>(),
        "author": signature_json(&commit.author),
        "committer": signature_json(&commit.committer),
        "message": commit.message,
    })
}

fn signature_json(sig: &Signature) -> Value {
    json!({
        "name": sig.name,
        "email": sig.email,
        "when": sig.when,
        "offset_minutes": sig.offset_minutes,
    })
}
