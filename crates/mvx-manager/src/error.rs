pub use mvx_tool::ToolError as ManagerError;
pub type Result<T> = std::result::Result<T, ManagerError>;
