use crate::dom::{Document, NodeId};
use crate::models::{CatalogEntry, FISH_ID_ATTR, FishId, USER_ID_ATTR};

pub const COLLECTION_ID: &str = "fish-collection";
pub const CATALOG_CHECKBOX_NAME: &str = "uncaughtfishcheckbox";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Warning,
    Danger,
}

impl Tone {
    fn suffix(self) -> &'static str {
        match self {
            Tone::Success => "success",
            Tone::Warning => "warning",
            Tone::Danger => "danger",
        }
    }
}

/// Which toggle control to show next to a fish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleControlKind {
    /// Shown once the fish is caught; clicking it marks the fish uncaught.
    MarkUncaught,
    /// Shown while the fish is uncaught.
    MarkCaught,
}

impl ToggleControlKind {
    pub fn label(self) -> &'static str {
        match self {
            ToggleControlKind::MarkUncaught => "Uncaught",
            ToggleControlKind::MarkCaught => "Caught!",
        }
    }

    fn tone(self) -> Tone {
        match self {
            ToggleControlKind::MarkUncaught => Tone::Danger,
            ToggleControlKind::MarkCaught => Tone::Success,
        }
    }

    fn marker_class(self) -> &'static str {
        match self {
            ToggleControlKind::MarkUncaught => "fish-uncaught-btn",
            ToggleControlKind::MarkCaught => "fish-caught-btn",
        }
    }
}

pub fn build_toggle_control(
    doc: &mut Document,
    fish_id: &FishId,
    kind: ToggleControlKind,
) -> NodeId {
    let link = doc.create_element("a");
    doc.set_attr(link, "href", format!("/fish/{fish_id}"));
    doc.add_class(link, "btn");
    doc.add_class(link, &format!("btn-{}", kind.tone().suffix()));
    doc.add_class(link, kind.marker_class());
    doc.set_text(link, kind.label());
    link
}

/// Dismissible alert. `body` is inserted as text, never as markup.
pub fn build_banner(doc: &mut Document, tone: Tone, body: &str) -> NodeId {
    let alert = doc.create_element("div");
    let tone_class = format!("alert-{}", tone.suffix());
    for class in [
        "alert",
        tone_class.as_str(),
        "alert-dismissible",
        "fade",
        "show",
    ] {
        doc.add_class(alert, class);
    }
    doc.set_attr(alert, "role", "alert");
    doc.set_text(alert, body);

    let close = doc.create_element("button");
    doc.set_attr(close, "type", "button");
    doc.add_class(close, "close");
    doc.set_attr(close, "data-dismiss", "alert");
    doc.set_attr(close, "aria-label", "Close");
    let glyph = doc.create_element("span");
    doc.set_attr(glyph, "aria-hidden", "true");
    doc.set_text(glyph, "\u{d7}");
    doc.append_child(close, glyph);
    doc.append_child(alert, close);
    alert
}

pub fn build_catalog_card(doc: &mut Document, entry: &CatalogEntry) -> NodeId {
    let checkbox_id = entry.checkbox_id();
    let name = entry.name.display();

    let card = doc.create_element("div");
    doc.add_class(card, "card");
    doc.add_class(card, "fish-card");

    let checkbox = doc.create_element("input");
    doc.set_attr(checkbox, "type", "checkbox");
    doc.add_class(checkbox, "form-check-input");
    doc.set_attr(checkbox, "id", checkbox_id.clone());
    doc.set_attr(checkbox, "name", CATALOG_CHECKBOX_NAME);
    doc.set_attr(checkbox, "value", entry.id.to_string());

    let label = doc.create_element("label");
    doc.add_class(label, "form-check-label");
    doc.set_attr(label, "for", checkbox_id);
    doc.set_text(label, name);

    let image = doc.create_element("img");
    doc.add_class(image, "card-img-top");
    doc.set_attr(image, "src", entry.icon_uri.clone());
    doc.set_attr(image, "alt", name);

    for child in [checkbox, label, image] {
        doc.append_child(card, child);
    }
    card
}

/// Element ids of the page regions the interaction layer writes into.
#[derive(Debug, Clone, Copy)]
pub struct Layout {
    pub message: NodeId,
    pub collection: NodeId,
    pub grid: NodeId,
}

/// Builds the static page regions that the server normally renders.
pub fn mount_layout(doc: &mut Document) -> Layout {
    let message = doc.create_element("div");
    doc.set_attr(message, "id", "message-container");

    let collection = doc.create_element("section");
    doc.set_attr(collection, "id", COLLECTION_ID);

    let form = doc.create_element("form");
    doc.set_attr(form, "method", "post");
    doc.set_attr(form, "action", "/save");
    let grid = doc.create_element("div");
    doc.set_attr(grid, "id", "uncaught-fish-grid");
    doc.add_class(grid, "row");
    doc.append_child(form, grid);

    let body = doc.body();
    for child in [message, collection, form] {
        doc.append_child(body, child);
    }
    Layout {
        message,
        collection,
        grid,
    }
}

/// Mounts one fish card of a user's collection view, with its toggle control.
///
/// Returns the toggle control element.
pub fn mount_collection_card(
    doc: &mut Document,
    parent: NodeId,
    user_id: &str,
    fish_attr: &str,
    name: &str,
    caught: bool,
) -> NodeId {
    let card = doc.create_element("div");
    doc.add_class(card, "card");

    let body = doc.create_element("div");
    doc.add_class(body, "card-body");
    doc.set_attr(body, USER_ID_ATTR, user_id);
    doc.set_attr(body, FISH_ID_ATTR, fish_attr);

    let title = doc.create_element("h5");
    doc.add_class(title, "card-title");
    doc.set_text(title, name);

    let kind = if caught {
        ToggleControlKind::MarkUncaught
    } else {
        ToggleControlKind::MarkCaught
    };
    let href_id = FishId::parse_attr(fish_attr).unwrap_or_else(|_| FishId::new(fish_attr));
    let control = build_toggle_control(doc, &href_id, kind);

    doc.append_child(body, title);
    doc.append_child(body, control);
    doc.append_child(card, body);
    doc.append_child(parent, card);
    control
}

pub fn render_page(title: &str, body_html: &str) -> String {
    PAGE_HTML
        .replace("{{TITLE}}", &title.replace('<', "&lt;"))
        .replace("{{BODY}}", body_html)
}

const PAGE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}}</title>
  <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bootstrap@4.6.2/dist/css/bootstrap.min.css" />
  <style>
    #uncaught-fish-grid {
      display: grid;
      grid-template-columns: repeat(auto-fill, minmax(140px, 1fr));
      gap: 12px;
    }

    .fish-card {
      align-items: center;
      padding: 12px;
    }

    .fish-card img {
      width: 64px;
      height: 64px;
    }
  </style>
</head>
<body>
  <main class="container">
{{BODY}}
  </main>
</body>
</html>
"#;
