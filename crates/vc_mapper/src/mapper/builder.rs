use alloc::collections::VecDeque;
use alloc::format;
use alloc::vec;
use alloc::vec::Vec;
use core::any::TypeId;

use crate::info::{StructInfo, TypeInfo};
use crate::mapper::tag::{FLATTEN, IGNORE_THIS_FIELD, OMIT_NESTED, TagFunc, parse_options};
use crate::mapper::{FieldId, FieldInfo, StructMap};
use crate::utils::HashMap;

/// A struct type waiting for its fields to be mapped.
struct Pending {
    info: &'static StructInfo,
    /// The node listing the mapped fields.
    owner: FieldId,
    /// The index path of the struct field.
    index: Vec<usize>,
    /// The struct types being expanded on the way from the root.
    expanding: Vec<TypeId>,
}

#[cold]
#[inline(never)]
fn not_a_struct(info: &TypeInfo) -> ! {
    panic!("`{}` is not a struct, can not build its field tree", info.type_path());
}

#[cold]
#[inline(never)]
fn duplicated_path(info: &TypeInfo, exist: &FieldInfo, field: &FieldInfo) -> ! {
    panic!(
        "Duplicated path: `{}.{}`, indexes are {:?} and {:?}",
        info.type_path(),
        field.path,
        exist.index,
        field.index,
    );
}

/// Build the field tree of a record type by a breadth-first traversal.
///
/// # Panics
///
/// - `info` is not a struct, or an `Option` of a struct.
/// - Two fields resolve to the same canonical path.
pub(crate) fn build_struct_map(
    info: &'static TypeInfo,
    tag_name: &str,
    tag_func: TagFunc,
) -> StructMap {
    let root = FieldInfo::root(info);
    let Some(record) = root.elem.as_struct() else {
        not_a_struct(info);
    };

    let mut queue = VecDeque::new();
    queue.push_back(Pending {
        info: record,
        owner: FieldId::ROOT,
        index: Vec::new(),
        expanding: vec![root.elem.type_id()],
    });
    let mut nodes = vec![root];

    while let Some(pending) = queue.pop_front() {
        for (position, field) in pending.info.fields().iter().enumerate() {
            if !field.exported() && !field.embedded() {
                continue;
            }

            let tag = field.tags().get(tag_name).unwrap_or("");
            let (name, parts) = tag_func(field.name(), tag);
            if name == IGNORE_THIS_FIELD || name.is_empty() {
                continue;
            }

            let id = FieldId(nodes.len());
            let ty = field.type_info();
            let elem = ty.deref();
            let options = parse_options(&parts);

            let mut index = pending.index.clone();
            index.push(position);

            let owner_path = &nodes[pending.owner.0].path;
            let path = if owner_path.is_empty() {
                name.clone()
            } else {
                format!("{owner_path}.{name}")
            };

            let mut owner = id;
            if let Some(child) = elem.as_struct() {
                // The fields of the child are mapped at the parent level.
                if options.contains_key(FLATTEN) {
                    owner = pending.owner;
                }
                if field.embedded() && tag_func(field.name(), "").0 == name {
                    owner = pending.owner;
                }

                let child_id = elem.type_id();
                if !options.contains_key(OMIT_NESTED) && !pending.expanding.contains(&child_id) {
                    let mut expanding = pending.expanding.clone();
                    expanding.push(child_id);
                    queue.push_back(Pending {
                        info: child,
                        owner,
                        index: index.clone(),
                        expanding,
                    });
                }
            }

            if owner == id {
                nodes[pending.owner.0].children.push(id);
            }

            nodes.push(FieldInfo {
                id,
                index: index.into_boxed_slice(),
                path,
                name,
                parts,
                options,
                ty,
                elem,
                embedded: field.embedded(),
                children: Vec::new(),
                parent: Some(pending.owner),
            });
        }
    }

    let mut paths = HashMap::with_capacity_and_hasher(nodes.len(), Default::default());
    let mut leaves = HashMap::default();
    for field in &nodes[1..] {
        if let Some(exist) = paths.insert(field.path.clone(), field.id) {
            duplicated_path(info, &nodes[exist.0], field);
        }
        if !field.is_struct() {
            leaves.insert(field.path.clone(), field.id);
        }
    }

    StructMap {
        nodes,
        paths,
        leaves,
    }
}
