use crate::osm::{OsmElement, OsmNode, OsmWay};
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// Node id -> node lookup, built once per conversion.
///
/// Iteration follows the order in which ids were first seen. A repeated id
/// replaces the earlier node but keeps its position.
#[derive(Debug, Default)]
pub struct NodeIndex<'a> {
    nodes: Vec<&'a OsmNode>,
    positions: HashMap<i64, usize>,
}

impl<'a> NodeIndex<'a> {
    pub fn build(elements: &'a [OsmElement]) -> Self {
        let mut index = NodeIndex::default();
        for element in elements {
            if let OsmElement::Node(node) = element {
                index.insert(node);
            }
        }
        index
    }

    fn insert(&mut self, node: &'a OsmNode) {
        match self.positions.entry(node.id) {
            Entry::Occupied(slot) => self.nodes[*slot.get()] = node,
            Entry::Vacant(slot) => {
                slot.insert(self.nodes.len());
                self.nodes.push(node);
            }
        }
    }

    pub fn get(&self, id: i64) -> Option<&'a OsmNode> {
        self.positions.get(&id).map(|&position| self.nodes[position])
    }

    /// `[lon, lat]` of the node, GeoJSON axis order.
    pub fn coordinate(&self, id: i64) -> Option<Vec<f64>> {
        self.get(id).map(|node| vec![node.lon, node.lat])
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a OsmNode> + '_ {
        self.nodes.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Way id -> way lookup used to resolve relation members.
/// The first way carrying a given id wins.
#[derive(Debug, Default)]
pub struct WayIndex<'a> {
    ways: HashMap<i64, &'a OsmWay>,
}

impl<'a> WayIndex<'a> {
    pub fn build(elements: &'a [OsmElement]) -> Self {
        let mut ways = HashMap::new();
        for element in elements {
            if let OsmElement::Way(way) = element {
                ways.entry(way.id).or_insert(way);
            }
        }
        WayIndex { ways }
    }

    pub fn get(&self, id: i64) -> Option<&'a OsmWay> {
        self.ways.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.ways.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ways.is_empty()
    }
}
