/// Summary of an already-provisioned cluster as reported by the API.
#[derive(Clone, Debug)]
pub struct ClusterView {
    pub id: String,
    pub name: String,
    pub status: String,
    pub node_count: i64,
}
