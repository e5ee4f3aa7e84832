use contracts::master::hierarchy::HierarchyNode;

use super::state::FetchTicket;
use crate::master_data::api::MasterApi;
use crate::shared::error::CoreResult;

/// Run the fetch described by `ticket`.
///
/// Rows without an id column are skipped with a warning.
pub async fn fetch_options<A: MasterApi + ?Sized>(
    api: &A,
    ticket: &FetchTicket,
) -> CoreResult<Vec<HierarchyNode>> {
    let desc = ticket.level.descriptor();
    let records = api.list(desc.endpoint, &ticket.scope).await?;

    let mut nodes = Vec::with_capacity(records.len());
    for record in &records {
        match HierarchyNode::from_record(ticket.level, record) {
            Some(node) => nodes.push(node),
            None => log::warn!(
                "{} row without {} skipped",
                desc.endpoint,
                desc.id_field
            ),
        }
    }
    Ok(nodes)
}
