//! Built-in tool registration (spec.md §2: "registration" is a manager
//! concern, not a `Tool` concern).

use mvx_tool::Tool;
use std::collections::HashMap;
use std::sync::Arc;

pub const SUPPORTED_TOOLS: &[&str] = &["java", "maven", "mvnd", "node", "go"];

/// Build the name → adapter map for every tool this engine knows about.
pub fn build(client: reqwest::Client) -> HashMap<String, Arc<dyn Tool>> {
    let mut tools: HashMap<String, Arc<dyn Tool>> = HashMap::new();
    tools.insert("java".to_string(), Arc::new(mvx_tool_java::JavaTool::new(client.clone())));
    tools.insert("maven".to_string(), Arc::new(mvx_tool_maven::MavenTool::new(client.clone())));
    tools.insert("mvnd".to_string(), Arc::new(mvx_tool_mvnd::MvndTool::new(client.clone())));
    tools.insert("node".to_string(), Arc::new(mvx_tool_node::NodeTool::new(client.clone())));
    tools.insert("go".to_string(), Arc::new(mvx_tool_go::GoTool::new(client)));
    tools
}
