//! Sheet storage port - the host's attribute store.

use async_trait::async_trait;
use babel_domain::{FieldPatch, FieldSnapshot, RowId, Section};

use super::error::PortError;

/// Field reads and writes against one sheet.
///
/// Each call is atomic on the host side; nothing orders calls made by
/// independent handlers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SheetStore: Send + Sync {
    /// Current values of `names`. Missing fields are absent from the snapshot.
    async fn read_fields(&self, names: &[String]) -> Result<FieldSnapshot, PortError>;

    /// Applies `patch`. Silent patches must not raise change events on the host.
    async fn write_fields(&self, patch: &FieldPatch) -> Result<(), PortError>;

    /// Row ids of `section` in display order.
    async fn list_rows(&self, section: Section) -> Result<Vec<RowId>, PortError>;

    async fn delete_row(&self, section: Section, row_id: &RowId) -> Result<(), PortError>;

    /// Fresh opaque row id.
    fn new_row_id(&self) -> RowId;
}
