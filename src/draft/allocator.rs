use crate::models::{ClusterNode, NodeType};

/// Minimum VM id offset used when the first worker is added to a cluster that
/// currently has no workers. Keeps the worker id range clear of the masters.
pub const FIRST_WORKER_MIN_OFFSET: i64 = 5;

/// VM id offset used when the first master is added to a cluster that
/// currently has no masters.
pub const FIRST_MASTER_OFFSET: i64 = -5;

/// Computes the identity of the next node to add.
///
/// The new node's VM id, name and IP address are derived from a reference
/// node picked out of `existing`:
///
/// 1. If `existing` already contains nodes of the requested role, the
///    same-role node with the highest VM id is the reference and every
///    derived field is stepped by `+1`.
/// 2. If the cluster has nodes but none of the requested role, the node with
///    the lowest VM id overall is the reference. The step is
///    `max(existing.len(), 5)` for the first worker and `-5` for the first
///    master, and the derived name is forced to `<role>-1`.
/// 3. If the cluster is empty, `fallback` is returned unchanged.
///
/// Neither the VM id nor the last IP octet is bounds-checked here; a derived
/// octet can exceed 255 and callers that care must validate before use.
/// The function never mutates `existing`.
pub fn allocate_node(
    existing: &[ClusterNode],
    role: NodeType,
    fallback: &ClusterNode,
) -> ClusterNode {
    if let Some(reference) = existing
        .iter()
        .filter(|n| n.node_type == role)
        .max_by_key(|n| n.vm_id)
    {
        return derive_from(reference, 1);
    }

    let Some(reference) = existing.iter().min_by_key(|n| n.vm_id) else {
        return fallback.clone();
    };

    let step = match role {
        NodeType::Worker => (existing.len() as i64).max(FIRST_WORKER_MIN_OFFSET),
        NodeType::Master => FIRST_MASTER_OFFSET,
    };
    let mut node = derive_from(reference, step);
    node.name = format!("{}-1", role.as_str());
    node.node_type = role;
    node
}

/// Copies the reference node, stepping VM id, name suffix and last IP octet
/// by `step`.
fn derive_from(reference: &ClusterNode, step: i64) -> ClusterNode {
    ClusterNode {
        vm_id: reference.vm_id + step,
        name: shift_name_suffix(&reference.name, step),
        node_type: reference.node_type,
        ip_address: shift_last_octet(&reference.ip_address, step),
        cores: reference.cores,
        memory: reference.memory,
        storage_pool: reference.storage_pool.clone(),
    }
}

/// `worker-3` stepped by 2 becomes `worker-5`. A name without a numeric
/// suffix keeps its full text as the prefix and gets the step as suffix.
fn shift_name_suffix(name: &str, step: i64) -> String {
    if let Some((prefix, suffix)) = name.rsplit_once('-') {
        if let Ok(n) = suffix.parse::<i64>() {
            return format!("{}-{}", prefix, n + step);
        }
    }
    format!("{}-{}", name, step)
}

/// Replaces the last octet of a dotted-quad address with `last + step`.
/// An address without a dot is passed through untouched.
fn shift_last_octet(ip: &str, step: i64) -> String {
    if let Some((prefix, last)) = ip.rsplit_once('.') {
        if let Ok(n) = last.parse::<i64>() {
            return format!("{}.{}", prefix, n + step);
        }
    }
    ip.to_string()
}
