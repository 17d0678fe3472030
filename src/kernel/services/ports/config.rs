/// What to do with tree items whose parent folder has no record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OrphanPolicy {
    #[default]
    Drop,
    SurfaceAtRoot,
}

#[derive(Clone, Debug)]
pub struct WorkspaceConfig {
    pub max_tabs: usize,
    pub root_path: String,
    pub default_expanded: Vec<String>,
    pub orphan_policy: OrphanPolicy,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            max_tabs: 10,
            root_path: "/".to_string(),
            default_expanded: vec!["/".to_string(), "/src".to_string(), "/docs".to_string()],
            orphan_policy: OrphanPolicy::Drop,
        }
    }
}
