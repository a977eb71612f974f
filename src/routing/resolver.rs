// src/routing/resolver.rs
// DOCUMENTATION: Path resolution against the route table
// PURPOSE: Turn a request path into a root-to-leaf segment chain plus params

use super::segment::{InterceptLevel, SegmentKind};
use super::tree::SegmentNode;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Literal and intercept matches rank ahead of dynamic captures
const RANK_EXACT: u8 = 0;
const RANK_DYNAMIC: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Ordinary resolution; intercepting segments are invisible
    Primary,
    /// Slot resolution during a soft navigation
    Intercepting,
}

/// One matched segment and how many path components were consumed once it matched
#[derive(Clone, Copy)]
pub struct Step<'a> {
    pub node: &'a SegmentNode,
    pub consumed: usize,
}

pub struct RouteMatch<'a> {
    pub chain: Vec<Step<'a>>,
    pub params: HashMap<String, String>,
}

impl<'a> RouteMatch<'a> {
    pub fn leaf(&self) -> &'a SegmentNode {
        // a match always holds at least the starting node
        self.chain[self.chain.len() - 1].node
    }

    /// Whether an intercepting segment took part in the match
    pub fn intercepted(&self) -> bool {
        self.chain
            .iter()
            .any(|s| matches!(s.node.kind, SegmentKind::Intercept { .. }))
    }
}

/// No chain ends in a page for this path
pub struct RouteMiss<'a> {
    /// Longest partial chain, used to find the nearest not-found fallback
    pub chain: Vec<Step<'a>>,
}

struct Candidate<'a> {
    chain: Vec<Step<'a>>,
    ranks: Vec<u8>,
    params: Vec<(String, String)>,
}

struct Search<'a, 'p> {
    components: &'p [&'p str],
    mode: MatchMode,
    chain: Vec<Step<'a>>,
    ranks: Vec<u8>,
    params: Vec<(String, String)>,
    best: Option<Candidate<'a>>,
    deepest: Vec<Step<'a>>,
}

impl<'a, 'p> Search<'a, 'p> {
    fn walk(&mut self, node: &'a SegmentNode, pos: usize) {
        self.chain.push(Step { node, consumed: pos });
        self.track_deepest();

        if pos == self.components.len() && node.page.is_some() {
            self.offer();
        }

        for child in &node.children {
            match &child.kind {
                SegmentKind::Literal(name) => {
                    if self.components.get(pos) == Some(&name.as_str()) {
                        self.descend(child, pos + 1, RANK_EXACT);
                    }
                }
                SegmentKind::Dynamic(name) => {
                    if let Some(value) = self.components.get(pos) {
                        self.params.push((name.clone(), value.to_string()));
                        self.descend(child, pos + 1, RANK_DYNAMIC);
                        self.params.pop();
                    }
                }
                SegmentKind::Group(_) => self.walk(child, pos),
                SegmentKind::Intercept { level, name } if self.mode == MatchMode::Intercepting => {
                    let base = match level {
                        InterceptLevel::Same => Some(pos),
                        InterceptLevel::Parent => pos.checked_sub(1),
                        InterceptLevel::Root => Some(0),
                    };
                    if let Some(base) = base {
                        if self.components.get(base) == Some(&name.as_str()) {
                            self.descend(child, base + 1, RANK_EXACT);
                        }
                    }
                }
                _ => {}
            }
        }

        self.chain.pop();
    }

    fn descend(&mut self, child: &'a SegmentNode, pos: usize, rank: u8) {
        self.ranks.push(rank);
        self.walk(child, pos);
        self.ranks.pop();
    }

    fn track_deepest(&mut self) {
        let progress = |chain: &[Step<'a>]| (chain.last().map_or(0, |s| s.consumed), chain.len());
        if progress(&self.chain) > progress(&self.deepest) {
            self.deepest = self.chain.clone();
        }
    }

    fn offer(&mut self) {
        let better = match &self.best {
            None => true,
            Some(best) => match self.ranks.cmp(&best.ranks) {
                Ordering::Less => true,
                Ordering::Greater => false,
                // same specificity: the deeper chain wins, otherwise first registered
                Ordering::Equal => self.chain.len() > best.chain.len(),
            },
        };

        if better {
            self.best = Some(Candidate {
                chain: self.chain.clone(),
                ranks: self.ranks.clone(),
                params: self.params.clone(),
            });
        }
    }
}

/// Resolve `components[start..]` below `root`.
/// `start` is non-zero when resolving a slot owned by a nested segment.
pub fn resolve<'a>(
    root: &'a SegmentNode,
    components: &[&str],
    start: usize,
    mode: MatchMode,
) -> Result<RouteMatch<'a>, RouteMiss<'a>> {
    let mut search = Search {
        components,
        mode,
        chain: Vec::new(),
        ranks: Vec::new(),
        params: Vec::new(),
        best: None,
        deepest: Vec::new(),
    };
    search.walk(root, start.min(components.len()));

    match search.best {
        Some(best) => Ok(RouteMatch {
            chain: best.chain,
            params: best.params.into_iter().collect(),
        }),
        None => {
            log::debug!("No route for /{}", components.join("/"));
            Err(RouteMiss {
                chain: search.deepest,
            })
        }
    }
}
