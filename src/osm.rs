use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashMap;

/// Tag values keep their JSON type; `null` values are dropped on decode.
pub type Tags = HashMap<String, Value>;

#[derive(Debug, Clone, Deserialize)]
pub struct OsmNode {
    pub id: i64,
    pub lat: f64,
    pub lon: f64,
    #[serde(default, deserialize_with = "tags_without_nulls")]
    pub tags: Tags,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OsmWay {
    pub id: i64,
    #[serde(rename = "nodes", default)]
    pub node_refs: Vec<i64>,
    #[serde(default, deserialize_with = "tags_without_nulls")]
    pub tags: Tags,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OsmRelationMember {
    /// `None` when the member carries no `type` or one we don't know.
    #[serde(rename = "type", default, deserialize_with = "known_member_type")]
    pub member_type: Option<MemberType>,
    #[serde(rename = "ref")]
    pub member_id: i64,
    #[serde(default)]
    pub role: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberType {
    Node,
    Way,
    Relation,
}

impl MemberType {
    pub fn parse(value: &str) -> Option<MemberType> {
        match value {
            "node" => Some(MemberType::Node),
            "way" => Some(MemberType::Way),
            "relation" => Some(MemberType::Relation),
            _ => None,
        }
    }
}

impl OsmRelationMember {
    /// Untyped members are looked up among ways as well; only members that
    /// explicitly point at a node or relation are never resolved as rings.
    pub fn may_be_way(&self) -> bool {
        matches!(self.member_type, None | Some(MemberType::Way))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OsmRelation {
    pub id: i64,
    #[serde(default, deserialize_with = "members_with_ref")]
    pub members: Vec<OsmRelationMember>,
    #[serde(default, deserialize_with = "tags_without_nulls")]
    pub tags: Tags,
}

impl OsmRelation {
    pub fn is_multipolygon(&self) -> bool {
        self.tags.get("type").and_then(Value::as_str) == Some("multipolygon")
    }
}

/// One entry of an Overpass `elements` array.
///
/// Decoding fails for unknown `type` values and for elements missing the
/// fields their type requires; callers skip those entries.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OsmElement {
    Node(OsmNode),
    Way(OsmWay),
    Relation(OsmRelation),
}

impl OsmElement {
    pub fn id(&self) -> i64 {
        match self {
            OsmElement::Node(node) => node.id,
            OsmElement::Way(way) => way.id,
            OsmElement::Relation(relation) => relation.id,
        }
    }

    pub fn tags(&self) -> &Tags {
        match self {
            OsmElement::Node(node) => &node.tags,
            OsmElement::Way(way) => &way.tags,
            OsmElement::Relation(relation) => &relation.tags,
        }
    }

    pub fn get_tag(&self, key: &str) -> Option<&Value> {
        self.tags().get(key)
    }
}

fn tags_without_nulls<'de, D>(deserializer: D) -> Result<Tags, D::Error>
where
    D: Deserializer<'de>,
{
    let tags: Option<Tags> = Option::deserialize(deserializer)?;
    Ok(tags
        .unwrap_or_default()
        .into_iter()
        .filter(|(_, value)| !value.is_null())
        .collect())
}

fn known_member_type<'de, D>(deserializer: D) -> Result<Option<MemberType>, D::Error>
where
    D: Deserializer<'de>,
{
    let member_type: Option<String> = Option::deserialize(deserializer)?;
    Ok(member_type.as_deref().and_then(MemberType::parse))
}

/// Members without a usable `ref` are dropped, the rest of the relation is kept.
fn members_with_ref<'de, D>(deserializer: D) -> Result<Vec<OsmRelationMember>, D::Error>
where
    D: Deserializer<'de>,
{
    let members: Option<Vec<Value>> = Option::deserialize(deserializer)?;
    Ok(members
        .unwrap_or_default()
        .into_iter()
        .filter_map(|member| serde_json::from_value(member).ok())
        .collect())
}
