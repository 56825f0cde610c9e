use crate::index::{NodeIndex, WayIndex};
use crate::osm::{OsmNode, OsmRelation, OsmWay, Tags};
use geojson::{Feature, Geometry, JsonObject, Value};
use serde_json::json;
use tracing::debug;

/// Ordered `[lon, lat]` pairs resolved from a way's node references.
pub type Ring = Vec<Vec<f64>>;

/// How a resolved way is turned into a geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolygonMode {
    /// Closed rings (first pair == last pair) become Polygons, the rest LineStrings.
    #[default]
    InferFromClosure,
    /// Every way becomes a single-ring Polygon.
    ForcePolygon,
}

/// Look up the way's nodes in order, dropping ids missing from the index.
/// Returns `None` when fewer than two coordinates remain.
pub fn resolve_way_ring(way: &OsmWay, nodes: &NodeIndex) -> Option<Ring> {
    let ring: Ring = way
        .node_refs
        .iter()
        .filter_map(|&node_id| nodes.coordinate(node_id))
        .collect();

    if ring.len() < 2 {
        debug!(way_id = way.id, resolved = ring.len(), "way has too few resolvable nodes");
        return None;
    }
    Some(ring)
}

/// Exact comparison of the first and last pair, no tolerance.
/// Rings come from [`resolve_way_ring`] and hold at least two pairs.
pub fn is_closed_ring(ring: &[Vec<f64>]) -> bool {
    ring.first() == ring.last()
}

pub fn way_feature(way: &OsmWay, nodes: &NodeIndex, mode: PolygonMode) -> Option<Feature> {
    let ring = resolve_way_ring(way, nodes)?;

    let as_polygon = match mode {
        PolygonMode::ForcePolygon => true,
        PolygonMode::InferFromClosure => is_closed_ring(&ring),
    };
    let value = if as_polygon {
        Value::Polygon(vec![ring])
    } else {
        Value::LineString(ring)
    };

    Some(feature(value, properties_with_id(&way.tags, way.id)))
}

/// One Polygon with a ring per resolvable way member, in member order.
///
/// Member rings are taken as resolved, open or closed. Members that point
/// at a missing way or at a way with fewer than two known nodes are left
/// out; a relation with no usable member still yields a Feature with an
/// empty ring set.
pub fn relation_feature(relation: &OsmRelation, ways: &WayIndex, nodes: &NodeIndex) -> Feature {
    let rings: Vec<Ring> = relation
        .members
        .iter()
        .filter(|member| member.may_be_way())
        .filter_map(|member| {
            let way = ways.get(member.member_id);
            if way.is_none() {
                debug!(
                    relation_id = relation.id,
                    member_id = member.member_id,
                    "relation member way not found"
                );
            }
            resolve_way_ring(way?, nodes)
        })
        .collect();

    if rings.is_empty() {
        debug!(relation_id = relation.id, "relation has no resolvable member rings");
    }

    feature(
        Value::Polygon(rings),
        properties_with_id(&relation.tags, relation.id),
    )
}

/// Point Feature whose properties are the node's tags only.
pub fn node_feature(node: &OsmNode) -> Feature {
    feature(point(node), tag_properties(&node.tags))
}

/// Point Feature whose properties are the node's tags plus its `id`.
pub fn node_feature_with_id(node: &OsmNode) -> Feature {
    feature(point(node), properties_with_id(&node.tags, node.id))
}

fn point(node: &OsmNode) -> Value {
    Value::Point(vec![node.lon, node.lat])
}

fn feature(value: Value, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

fn tag_properties(tags: &Tags) -> JsonObject {
    tags.iter()
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Tags merged with the element id; the id wins over an `id` tag.
fn properties_with_id(tags: &Tags, id: i64) -> JsonObject {
    let mut properties = tag_properties(tags);
    properties.insert("id".to_string(), json!(id));
    properties
}
