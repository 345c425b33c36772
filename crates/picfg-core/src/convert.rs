// ── XML document → domain conversion ──
//
// Reads the three Prime documents the workflow consumes. Lookups are by
// element name anywhere below the root, so wrapper elements
// (`entity`, `configVersionsDTO`, `fileInfos`, ...) don't matter.

use picfg_api::Element;
use tracing::debug;

use crate::error::CoreError;
use crate::model::{ConfigVersionId, ConfigVersionRecord, FileInfo, FileState};

/// One page of `data/ConfigVersions.xml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPage {
    /// Total number of records on the server, from the root `count` attribute.
    pub count: u64,
    pub ids: Vec<ConfigVersionId>,
}

/// Parse a listing page: the root `count` attribute plus every `entityId`.
pub fn listing_page(root: &Element) -> Result<ListingPage, CoreError> {
    let count = root
        .attr("count")
        .and_then(|c| c.trim().parse::<u64>().ok())
        .ok_or_else(|| CoreError::missing("count", "configuration version listing"))?;

    let entities = root.find_all("entityId");
    let ids: Vec<ConfigVersionId> = entities
        .iter()
        .filter_map(|e| e.text())
        .map(|t| ConfigVersionId::new(t.trim()))
        .collect();

    if ids.len() != entities.len() {
        debug!(
            skipped = entities.len() - ids.len(),
            "ignoring empty entityId elements"
        );
    }

    Ok(ListingPage { count, ids })
}

/// Trimmed text of a present element. An element with no text reads as "".
fn present_text(element: &Element) -> String {
    element.text().unwrap_or_default().trim().to_owned()
}

/// Parse a `data/ConfigVersions/{id}.xml` detail document.
///
/// Device IP and name are required, as are `fileId`, `fileState` and
/// `fileType` of every `fileInfo`. Required means the element exists;
/// its text may be empty.
pub fn version_record(
    id: &ConfigVersionId,
    root: &Element,
) -> Result<ConfigVersionRecord, CoreError> {
    let context = || format!("configuration version {id}");

    let device_ip = root
        .find("deviceIpAddress")
        .map(present_text)
        .ok_or_else(|| CoreError::missing("deviceIpAddress", context()))?;
    let device_name = root
        .find("deviceName")
        .map(present_text)
        .ok_or_else(|| CoreError::missing("deviceName", context()))?;

    let files = root
        .find_all("fileInfo")
        .into_iter()
        .map(|info| file_info(info, &context))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ConfigVersionRecord {
        device_id: id.clone(),
        device_ip,
        device_name,
        files,
    })
}

fn file_info(info: &Element, context: &dyn Fn() -> String) -> Result<FileInfo, CoreError> {
    let required = |field: &str| {
        info.child(field)
            .map(present_text)
            .ok_or_else(|| CoreError::missing(field, context()))
    };

    let file_id = required("fileId")?;
    let file_state = match required("fileState")?.parse::<FileState>() {
        Ok(state) => state,
        Err(never) => match never {},
    };
    let file_type = required("fileType")?;

    Ok(FileInfo {
        file_id,
        file_state,
        file_type,
    })
}

/// The configuration body of an `extractSanitizedFile.xml` response.
pub fn file_data(root: &Element) -> Option<&str> {
    if root.name == "fileData" {
        return root.text();
    }
    root.find_text("fileData")
}
