use crate::dom::{Document, FishGrid, NodeId};
use crate::errors::UiError;
use crate::models::CatalogEntry;
use crate::notify::report_failure;
use crate::state::Page;
use crate::ui::{CATALOG_CHECKBOX_NAME, build_catalog_card};
use tracing::{debug, info};

/// Loads the species catalog into `#uncaught-fish-grid`.
#[derive(Clone)]
pub struct FishCatalogLoader {
    page: Page,
}

impl FishCatalogLoader {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// Fetches the full catalog and renders it. Returns the number of cards.
    pub async fn get_all_fish(&self) -> Result<usize, UiError> {
        let fish = self.page.catalog.all_fish().await?;
        info!(count = fish.len(), "loaded fish catalog");

        let mut doc = self.page.document.lock().await;
        let cards = populate_images(&mut doc, &fish)?;
        Ok(cards.len())
    }

    /// [`get_all_fish`](Self::get_all_fish) with failures sent to the banner.
    /// The grid keeps its previous cards when the load fails.
    pub async fn load(&self) -> Result<usize, UiError> {
        let loaded = self.get_all_fish().await;
        if let Err(err) = &loaded {
            report_failure(&self.page, err).await;
        }
        loaded
    }

    /// Diagnostic lookup of one species; logs it and leaves the page alone.
    pub async fn get_fish(&self, id: u32) -> Result<CatalogEntry, UiError> {
        let fish = self.page.catalog.fish(id).await?;
        debug!(
            id = fish.id,
            name = fish.name.display(),
            icon_uri = %fish.icon_uri,
            image_uri = ?fish.image_uri,
            catch_phrase = ?fish.catch_phrase,
            "fetched fish"
        );
        Ok(fish)
    }

    /// Ids of the checked catalog cards, in grid order.
    pub async fn selected_fish(&self) -> Result<Vec<u32>, UiError> {
        let doc = self.page.document.lock().await;
        selected_fish(&doc)
    }
}

/// Empties the grid, then appends one card per entry in input order.
pub fn populate_images(
    doc: &mut Document,
    fish: &[CatalogEntry],
) -> Result<Vec<NodeId>, UiError> {
    let grid = FishGrid::resolve(doc)?.node();
    doc.clear_children(grid);

    let mut cards = Vec::with_capacity(fish.len());
    for entry in fish {
        let card = build_catalog_card(doc, entry);
        doc.append_child(grid, card);
        cards.push(card);
    }
    Ok(cards)
}

pub fn selected_fish(doc: &Document) -> Result<Vec<u32>, UiError> {
    let grid = FishGrid::resolve(doc)?.node();
    let mut ids = Vec::new();
    for checkbox in doc.descendants_with_class(grid, "form-check-input") {
        let in_form = doc.attr(checkbox, "name") == Some(CATALOG_CHECKBOX_NAME);
        if !in_form || !doc.is_checked(checkbox) {
            continue;
        }
        let Some(value) = doc.attr(checkbox, "value") else {
            continue;
        };
        let id = value.parse::<u32>().map_err(|_| UiError::MalformedAttribute {
            attr: "value",
            value: value.to_string(),
        })?;
        ids.push(id);
    }
    Ok(ids)
}
