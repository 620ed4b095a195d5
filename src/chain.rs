//! # Segment Stitching
//!
//! Joins unordered trail segments into one ordered chain.
//!
//! ## Algorithm
//! 1. **Start**: pick the segment endpoint nearest the anchor (planar distance)
//!    and consume that segment, reversed if its end was the nearer side.
//! 2. **Exact extension**: look up the chain tail's [`EndpointKey`]. The first
//!    unused candidate wins; a matched `End` means the segment is appended
//!    reversed.
//! 3. **Nearest fallback**: with no usable exact candidate, scan every unused
//!    segment for the endpoint nearest the tail. Accept it if closer than the
//!    tolerance, otherwise the chain stalls.
//! 4. Appended segments drop their first point, which duplicates the tail.
//!
//! Extension runs at most once per segment, so the loop always terminates.
//! A stalled chain is a normal, partial result: unconsumed segments are
//! reported, not raised.
//!
//! ## Tie-breaking
//! Every search walks segments in index order and compares with strict `<`,
//! checking the start endpoint before the end. Equal distances therefore go to
//! the lowest segment index and to its start. Exact-key candidates are taken in
//! index order with no ranking. Changing either order changes the output.

use log::{debug, info, warn};
use serde::Deserialize;

use crate::endpoint_index::{EndpointIndex, EndpointKey, SegmentEnd};
use crate::geo_utils::planar_distance;
use crate::{GpsPoint, Result, Segment, StitchError};

/// Default anchor: Springer Mountain, the Appalachian Trail's southern terminus.
pub const SPRINGER_MOUNTAIN: GpsPoint = GpsPoint {
    latitude: 34.6295,
    longitude: -84.1927,
};

/// Configuration for chain building.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Fixed point used only to choose the starting segment.
    /// Default: Springer Mountain (-84.1927, 34.6295)
    pub anchor: GpsPoint,

    /// Maximum planar distance, in degrees, for the nearest-endpoint fallback.
    /// A candidate must be strictly closer than this. Default: 0.1 (~11 km)
    pub tolerance: f64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            anchor: SPRINGER_MOUNTAIN,
            tolerance: 0.1,
        }
    }
}

/// Lifecycle of a [`ChainBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainState {
    SelectingStart,
    Extending,
    /// No unused endpoint lies within tolerance of the tail.
    Stalled,
    Complete,
}

/// Why chaining stopped. All variants are successful outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    AllConsumed,
    BudgetExhausted,
    Stalled,
}

/// How a segment joined the chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LinkKind {
    /// Starting segment; `distance` is from the anchor.
    Anchor { distance: f64 },
    /// Tail and segment endpoint share an [`EndpointKey`].
    Exact,
    /// Nearest-endpoint fallback within tolerance.
    Nearest { distance: f64 },
}

/// One consumed segment, in chain order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainLink {
    pub segment: usize,
    pub reversed: bool,
    pub kind: LinkKind,
}

/// Output of a stitching run.
#[derive(Debug, Clone)]
pub struct StitchedChain {
    /// Ordered chain points.
    pub points: Vec<GpsPoint>,
    /// Consumed segments in the order they were appended.
    pub links: Vec<ChainLink>,
    pub termination: Termination,
    /// Size of the input segment set.
    pub total_segments: usize,
}

impl StitchedChain {
    pub fn used_count(&self) -> usize {
        self.links.len()
    }

    /// Segments never reached. Nonzero means a partial trail.
    pub fn unused_count(&self) -> usize {
        self.total_segments - self.links.len()
    }

    /// Indices of segments never reached, ascending.
    pub fn unused_segments(&self) -> Vec<usize> {
        let mut used = vec![false; self.total_segments];
        for link in &self.links {
            used[link.segment] = true;
        }
        (0..self.total_segments).filter(|&i| !used[i]).collect()
    }
}

/// Best endpoint found by a linear scan.
#[derive(Debug, Clone, Copy)]
struct Nearest {
    segment: usize,
    reversed: bool,
    distance: f64,
}

/// Scan `segments` for the endpoint nearest `target`, skipping `used`.
///
/// Strict `<` keeps the first minimum: lowest index, start before end.
/// NaN distances never win.
fn nearest_endpoint(segments: &[Segment], used: &[bool], target: &GpsPoint) -> Option<Nearest> {
    let mut best: Option<Nearest> = None;

    for (idx, seg) in segments.iter().enumerate() {
        if used[idx] {
            continue;
        }
        for (end, reversed) in [(SegmentEnd::Start, false), (SegmentEnd::End, true)] {
            let distance = planar_distance(&seg.endpoint(end), target);
            if distance < best.map_or(f64::INFINITY, |b| b.distance) {
                best = Some(Nearest { segment: idx, reversed, distance });
            }
        }
    }

    best
}

/// Stitching engine. Owns the endpoint index, the used-set and the chain.
///
/// Drive it with [`ChainBuilder::run`], or step manually with
/// [`ChainBuilder::select_start`] and [`ChainBuilder::extend`].
pub struct ChainBuilder<'a> {
    segments: &'a [Segment],
    config: ChainConfig,
    index: EndpointIndex,
    used: Vec<bool>,
    links: Vec<ChainLink>,
    chain: Vec<GpsPoint>,
    state: ChainState,
    iterations: usize,
}

impl<'a> ChainBuilder<'a> {
    /// Index `segments` and prepare to stitch.
    ///
    /// Fails with [`StitchError::EmptySegmentSet`] when there is nothing to
    /// start from.
    pub fn new(segments: &'a [Segment], config: &ChainConfig) -> Result<Self> {
        if segments.is_empty() {
            return Err(StitchError::EmptySegmentSet);
        }

        let index = EndpointIndex::build(segments);
        debug!(
            "Indexed {} segments under {} endpoint keys",
            segments.len(),
            index.len()
        );

        Ok(Self {
            segments,
            config: config.clone(),
            index,
            used: vec![false; segments.len()],
            links: Vec::with_capacity(segments.len()),
            chain: Vec::new(),
            state: ChainState::SelectingStart,
            iterations: 0,
        })
    }

    pub fn state(&self) -> ChainState {
        self.state
    }

    /// Chain points so far.
    pub fn points(&self) -> &[GpsPoint] {
        &self.chain
    }

    pub fn used_count(&self) -> usize {
        self.links.len()
    }

    pub fn unused_count(&self) -> usize {
        self.segments.len() - self.links.len()
    }

    /// Consume the segment whose endpoint is nearest the anchor.
    ///
    /// No-op unless the builder is in [`ChainState::SelectingStart`].
    pub fn select_start(&mut self) -> ChainState {
        if self.state != ChainState::SelectingStart {
            return self.state;
        }

        let anchor = self.config.anchor;
        // Every distance NaN: take the first segment as-is.
        let start = nearest_endpoint(self.segments, &self.used, &anchor).unwrap_or(Nearest {
            segment: 0,
            reversed: false,
            distance: f64::NAN,
        });

        info!(
            "Starting segment: {} reverse: {} dist: {:.6}",
            start.segment, start.reversed, start.distance
        );

        self.consume(
            start.segment,
            start.reversed,
            LinkKind::Anchor { distance: start.distance },
        );
        self.state = self.next_state();
        self.state
    }

    /// Run one extension step and return the resulting state.
    ///
    /// Selects the start first if that has not happened yet. Once the
    /// builder is `Stalled` or `Complete` this is a no-op.
    pub fn extend(&mut self) -> ChainState {
        match self.state {
            ChainState::SelectingStart => return self.select_start(),
            ChainState::Stalled | ChainState::Complete => return self.state,
            ChainState::Extending => {}
        }

        self.iterations += 1;
        let last = self.chain[self.chain.len() - 1];
        let key = EndpointKey::from_point(&last);

        let exact = self
            .index
            .candidates(&key)
            .iter()
            .find(|cand| !self.used[cand.segment])
            .copied();

        if let Some(cand) = exact {
            self.consume(cand.segment, cand.end == SegmentEnd::End, LinkKind::Exact);
        } else {
            match nearest_endpoint(self.segments, &self.used, &last) {
                Some(near) if near.distance < self.config.tolerance => {
                    debug!(
                        "No exact match at {}; nearest segment {} at {:.6} (reverse: {})",
                        key, near.segment, near.distance, near.reversed
                    );
                    self.consume(
                        near.segment,
                        near.reversed,
                        LinkKind::Nearest { distance: near.distance },
                    );
                }
                near => {
                    warn!(
                        "Chain stalled at {} with {} segments unused (nearest: {})",
                        key,
                        self.unused_count(),
                        near.map_or_else(|| "none".to_string(), |n| format!("{:.6}", n.distance))
                    );
                    self.state = ChainState::Stalled;
                    return self.state;
                }
            }
        }

        self.state = self.next_state();
        self.state
    }

    /// Run to termination and return the chain.
    pub fn run(mut self) -> StitchedChain {
        self.select_start();
        while self.state == ChainState::Extending {
            self.extend();
        }
        self.finish()
    }

    /// Stop and return the chain built so far.
    pub fn finish(self) -> StitchedChain {
        let termination = if self.unused_count() == 0 {
            Termination::AllConsumed
        } else if self.state == ChainState::Stalled {
            Termination::Stalled
        } else {
            Termination::BudgetExhausted
        };

        info!(
            "Chained segments: {} / {} ({} points, {:?})",
            self.links.len(),
            self.segments.len(),
            self.chain.len(),
            termination
        );

        StitchedChain {
            points: self.chain,
            links: self.links,
            termination,
            total_segments: self.segments.len(),
        }
    }

    /// Mark `segment` used and append its points, dropping the first one
    /// when the chain already has a tail.
    fn consume(&mut self, segment: usize, reversed: bool, kind: LinkKind) {
        self.used[segment] = true;
        let skip = usize::from(!self.chain.is_empty());
        self.chain
            .extend(self.segments[segment].oriented(reversed).skip(skip));
        self.links.push(ChainLink { segment, reversed, kind });
    }

    fn next_state(&self) -> ChainState {
        if self.unused_count() == 0 || self.iterations >= self.segments.len() {
            ChainState::Complete
        } else {
            ChainState::Extending
        }
    }
}

/// Stitch `segments` into one chain starting near `config.anchor`.
///
/// Fails only for an empty segment set. Segments that cannot be reached are
/// left out and reported by [`StitchedChain::unused_count`].
///
/// # Example
/// ```
/// use trail_stitcher::{GpsPoint, Segment, ChainConfig, Termination, stitch_segments};
///
/// let a = Segment::new(vec![GpsPoint::new(0.0, 0.0), GpsPoint::new(1.0, 1.0)]).unwrap();
/// let far = Segment::new(vec![GpsPoint::new(10.0, 10.0), GpsPoint::new(11.0, 11.0)]).unwrap();
///
/// let config = ChainConfig { anchor: GpsPoint::new(0.0, 0.0), ..ChainConfig::default() };
/// let chain = stitch_segments(&[a, far], &config).unwrap();
///
/// assert_eq!(chain.termination, Termination::Stalled);
/// assert_eq!(chain.unused_segments(), vec![1]);
/// ```
pub fn stitch_segments(segments: &[Segment], config: &ChainConfig) -> Result<StitchedChain> {
    Ok(ChainBuilder::new(segments, config)?.run())
}
