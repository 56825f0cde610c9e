use crate::error::{ConvertError, Result};
use crate::geometry::{
    PolygonMode, node_feature, node_feature_with_id, relation_feature, way_feature,
};
use crate::index::{NodeIndex, WayIndex};
use crate::input::{OverpassInput, validate_input};
use crate::osm::OsmElement;
use anyhow::Context;
use geojson::{Feature, FeatureCollection};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use tracing::{debug, info};

/// Which elements end up in the FeatureCollection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversionMode {
    /// Multipolygon relations, then ways not used by them, then tagged
    /// nodes not used by any emitted way.
    #[default]
    AllDeduplicated,
    Nodes,
    Ways(PolygonMode),
    Relations,
}

impl ConversionMode {
    /// Mode for a command-line name (`all`, `nodes`, `ways`, `relations`).
    /// `ForcePolygon` only applies to ways and is rejected for other modes.
    pub fn from_name(name: &str, polygon_mode: PolygonMode) -> anyhow::Result<ConversionMode> {
        let mode = match name {
            "all" => ConversionMode::AllDeduplicated,
            "nodes" => ConversionMode::Nodes,
            "ways" => return Ok(ConversionMode::Ways(polygon_mode)),
            "relations" => ConversionMode::Relations,
            other => anyhow::bail!("Unknown conversion mode: {}", other),
        };
        if polygon_mode == PolygonMode::ForcePolygon {
            anyhow::bail!("Forcing polygons is only supported in ways mode, not '{}'", name);
        }
        Ok(mode)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Compact,
    Pretty,
}

pub fn convert(input: impl Into<OverpassInput>, mode: ConversionMode) -> Result<FeatureCollection> {
    let elements = validate_input(input.into())?;

    let features = match mode {
        ConversionMode::AllDeduplicated => all_deduplicated_features(&elements),
        ConversionMode::Nodes => node_features(&elements),
        ConversionMode::Ways(polygon_mode) => way_features(&elements, polygon_mode),
        ConversionMode::Relations => relation_features(&elements),
    };
    info!(?mode, features = features.len(), "conversion complete");

    Ok(collection(features))
}

/// A Point per indexed node, properties are the node's tags.
pub fn convert_nodes(input: impl Into<OverpassInput>) -> Result<FeatureCollection> {
    convert(input, ConversionMode::Nodes)
}

/// A LineString or Polygon per way with at least two resolvable nodes.
pub fn convert_ways(
    input: impl Into<OverpassInput>,
    polygon_mode: PolygonMode,
) -> Result<FeatureCollection> {
    convert(input, ConversionMode::Ways(polygon_mode))
}

/// A Polygon per relation, degenerate ones included.
pub fn convert_relations(input: impl Into<OverpassInput>) -> Result<FeatureCollection> {
    convert(input, ConversionMode::Relations)
}

pub fn convert_all_deduplicated(input: impl Into<OverpassInput>) -> Result<FeatureCollection> {
    convert(input, ConversionMode::AllDeduplicated)
}

pub fn encode(collection: &FeatureCollection, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Compact => serde_json::to_string(collection),
        OutputFormat::Pretty => serde_json::to_string_pretty(collection),
    }
    .map_err(ConvertError::Encode)
}

pub fn convert_to_string(
    input: impl Into<OverpassInput>,
    mode: ConversionMode,
    format: OutputFormat,
) -> Result<String> {
    encode(&convert(input, mode)?, format)
}

/// Read an Overpass response from `input_path` (stdin for `None` or `-`),
/// convert it and write the GeoJSON to `output_path` (stdout for `None`).
pub fn convert_file(
    input_path: Option<&str>,
    output_path: Option<&String>,
    mode: ConversionMode,
    pretty_print: bool,
) -> anyhow::Result<()> {
    let mut raw = Vec::new();
    match input_path {
        Some(path) if path != "-" => {
            File::open(path)
                .with_context(|| format!("Failed to open input file: {}", path))?
                .read_to_end(&mut raw)
                .with_context(|| format!("Failed to read input file: {}", path))?;
        }
        _ => {
            std::io::stdin()
                .read_to_end(&mut raw)
                .context("Failed to read stdin")?;
        }
    }
    info!(bytes = raw.len(), "read Overpass response");

    let format = if pretty_print {
        OutputFormat::Pretty
    } else {
        OutputFormat::Compact
    };
    let json = convert_to_string(raw, mode, format).context("Failed to convert Overpass data")?;

    let mut writer: Box<dyn Write> = match output_path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(std::io::stdout()),
    };
    writeln!(writer, "{}", json)?;
    writer.flush()?;

    Ok(())
}

fn collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

fn node_features(elements: &[OsmElement]) -> Vec<Feature> {
    NodeIndex::build(elements).iter().map(node_feature).collect()
}

fn way_features(elements: &[OsmElement], polygon_mode: PolygonMode) -> Vec<Feature> {
    let nodes = NodeIndex::build(elements);

    elements
        .iter()
        .filter_map(|element| match element {
            OsmElement::Way(way) => way_feature(way, &nodes, polygon_mode),
            _ => None,
        })
        .collect()
}

fn relation_features(elements: &[OsmElement]) -> Vec<Feature> {
    let nodes = NodeIndex::build(elements);
    let ways = WayIndex::build(elements);

    elements
        .iter()
        .filter_map(|element| match element {
            OsmElement::Relation(relation) => Some(relation_feature(relation, &ways, &nodes)),
            _ => None,
        })
        .collect()
}

fn all_deduplicated_features(elements: &[OsmElement]) -> Vec<Feature> {
    let nodes = NodeIndex::build(elements);
    let ways = WayIndex::build(elements);
    debug!(nodes = nodes.len(), ways = ways.len(), "indexed elements");

    let mut features = Vec::new();
    let mut ways_in_relations: HashSet<i64> = HashSet::new();
    let mut nodes_in_ways: HashSet<i64> = HashSet::new();

    // Pass 1: multipolygons claim their member ways and those ways' nodes
    for element in elements {
        let OsmElement::Relation(relation) = element else {
            continue;
        };
        if !relation.is_multipolygon() {
            continue;
        }

        features.push(relation_feature(relation, &ways, &nodes));
        for member in relation.members.iter().filter(|member| member.may_be_way()) {
            if let Some(way) = ways.get(member.member_id) {
                ways_in_relations.insert(way.id);
                nodes_in_ways.extend(way.node_refs.iter().copied());
            }
        }
    }
    let relation_count = features.len();

    // Pass 2: standalone ways
    for element in elements {
        let OsmElement::Way(way) = element else {
            continue;
        };
        if ways_in_relations.contains(&way.id) {
            continue;
        }

        if let Some(feature) = way_feature(way, &nodes, PolygonMode::InferFromClosure) {
            features.push(feature);
        }
        nodes_in_ways.extend(way.node_refs.iter().copied());
    }
    let way_count = features.len() - relation_count;

    // Pass 3: tagged nodes that are points of interest on their own
    features.extend(
        nodes
            .iter()
            .filter(|node| !node.tags.is_empty() && !nodes_in_ways.contains(&node.id))
            .map(node_feature_with_id),
    );

    info!(
        relations = relation_count,
        ways = way_count,
        nodes = features.len() - relation_count - way_count,
        "deduplicated conversion passes complete"
    );
    features
}
