use svg::Document;
use svg::node::Blob;
use svg::node::element::{Group, Rectangle, Title};

use crate::entities::{MaterialSurface, PlacedPart};

/// Id of the group that holds every nested part
pub const PARTS_GROUP_ID: &str = "nested-parts";

/// Builds one document with the material and every placed part at its final position.
/// Each part's fragment is wrapped in its own group carrying the placement transform.
pub fn compose_nesting_document(
    surface: &MaterialSurface,
    material_fragment: Option<&str>,
    placed_parts: &[PlacedPart],
) -> Document {
    let (w, h) = (surface.width(), surface.height());

    let material_group = {
        let group = Group::new().set("id", "material");
        match material_fragment {
            Some(fragment) => group.add(Blob::new(fragment)),
            None => group.add(
                Rectangle::new()
                    .set("x", 0.0)
                    .set("y", 0.0)
                    .set("width", w)
                    .set("height", h)
                    .set("fill", "none")
                    .set("stroke", "black")
                    .set("stroke-width", f64::min(w, h) * 0.001),
            ),
        }
    };

    let parts_group = placed_parts
        .iter()
        .fold(Group::new().set("id", PARTS_GROUP_ID), |group, pp| {
            group.add(part_group(pp))
        });

    Document::new()
        .set("viewBox", (0.0, 0.0, w, h))
        .set("width", w)
        .set("height", h)
        .add(material_group)
        .add(parts_group)
}

fn part_group(pp: &PlacedPart) -> Group {
    let title = Title::new(format!(
        "part {}, footprint: {}, rotation: {}",
        pp.part_id, pp.footprint, pp.rotation
    ));
    Group::new()
        .set("id", format!("part_{}", pp.index))
        .set("data-part-id", pp.part_id.as_str())
        .set("transform", pp.transform.to_string())
        .add(title)
        .add(Blob::new(pp.fragment.as_ref()))
}
