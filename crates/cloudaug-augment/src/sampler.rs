use std::collections::{BTreeMap, HashMap};

use rand::seq::IndexedRandom;
use rand::Rng;

use cloudaug_3d::bbox::BoundingBox3D;
use cloudaug_3d::ops::{bev_overlap, bev_rect, remove_points_in_boxes, BevRect};

use crate::objdet::ObjdetSample;
use crate::AugmentError;

/// Multiplier on the per-class instance deficit; partial-sampling policies
/// with a rate below one are unverified and not exposed.
const SAMPLE_RATE: f64 = 1.0;

/// A donor object: a labeled box together with the points that lie inside it.
#[derive(Debug, Clone)]
pub struct DonorBox {
    bbox: BoundingBox3D,
    points: Vec<[f64; 3]>,
}

impl DonorBox {
    /// Create a donor from a box and its precomputed enclosed points.
    pub fn new(bbox: BoundingBox3D, points: Vec<[f64; 3]>) -> Self {
        Self { bbox, points }
    }

    /// The donor's bounding box.
    pub fn bbox(&self) -> &BoundingBox3D {
        &self.bbox
    }

    /// The points enclosed by the donor's box.
    pub fn points(&self) -> &[[f64; 3]] {
        &self.points
    }
}

/// The donor pool of one class.
#[derive(Debug, Clone)]
pub struct ClassPool {
    label: i32,
    donors: Vec<DonorBox>,
}

impl ClassPool {
    /// Create an empty pool for the class with the given integer label.
    pub fn new(label: i32) -> Self {
        Self {
            label,
            donors: Vec::new(),
        }
    }

    /// The integer label scene boxes of this class carry.
    pub fn label(&self) -> i32 {
        self.label
    }

    /// The donors of the pool.
    pub fn donors(&self) -> &[DonorBox] {
        &self.donors
    }

    /// Add a donor to the pool.
    pub fn push(&mut self, donor: DonorBox) {
        self.donors.push(donor);
    }

    /// Number of donors in the pool.
    pub fn len(&self) -> usize {
        self.donors.len()
    }

    /// Whether the pool has no donors.
    pub fn is_empty(&self) -> bool {
        self.donors.is_empty()
    }
}

/// Donor pools indexed by class name.
///
/// Built and owned by the caller; the sampler only reads from it.
#[derive(Debug, Clone, Default)]
pub struct SampleDatabase {
    pools: HashMap<String, ClassPool>,
}

impl SampleDatabase {
    /// Create an empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace) the pool for a class.
    pub fn insert_pool(&mut self, class: impl Into<String>, pool: ClassPool) {
        self.pools.insert(class.into(), pool);
    }

    /// The pool for a class, when present.
    pub fn pool(&self, class: &str) -> Option<&ClassPool> {
        self.pools.get(class)
    }

    /// Number of classes in the database.
    pub fn len(&self) -> usize {
        self.pools.len()
    }

    /// Whether the database has no classes.
    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}

/// Desired total instance count per scene, by class name.
///
/// Ordered so that multi-class sampling is deterministic for a seeded
/// generator.
pub type SampleTargets = BTreeMap<String, usize>;

/// Draw up to `count` donors from a class pool, avoiding collisions.
///
/// Donors are drawn without replacement, so no donor is returned twice in the
/// same call. A candidate is rejected when its bird's-eye-view footprint
/// overlaps (conservatively) a box already in the scene or a candidate
/// accepted earlier in the same call; fewer than `count` donors may be
/// returned.
pub fn sample_class<'a, R: Rng>(
    pool: &'a ClassPool,
    count: usize,
    existing: &[BoundingBox3D],
    rng: &mut R,
) -> Vec<&'a DonorBox> {
    let existing_rects: Vec<BevRect> = existing.iter().map(bev_rect).collect();

    let mut accepted: Vec<&DonorBox> = Vec::with_capacity(count);
    let mut accepted_rects: Vec<BevRect> = Vec::with_capacity(count);

    for donor in pool.donors().choose_multiple(rng, count) {
        let rect = bev_rect(donor.bbox());
        let collides = existing_rects
            .iter()
            .chain(accepted_rects.iter())
            .any(|other| bev_overlap(&rect, other));
        if !collides {
            accepted_rects.push(rect);
            accepted.push(donor);
        }
    }

    accepted
}

/// Paste additional objects from a donor database into a scene until each
/// class approaches its target instance count.
///
/// For every class in `targets`, the deficit against the boxes already in the
/// scene is computed and that many donors are requested from the class pool;
/// classes already at or above target are skipped (existing instances are
/// never removed). The working box list grows as each class is processed, so
/// later classes sample collision-aware against earlier injected ones. When
/// any donors were accepted, scene points falling inside a sampled box are
/// removed and the donors' precomputed points are concatenated in front of
/// the remaining scene points.
///
/// # Errors
///
/// [`AugmentError::MissingClass`] when a target class has no pool in the
/// database; the call fails before mutating the sample.
pub fn object_sample<C, R: Rng>(
    sample: ObjdetSample<C>,
    db: &SampleDatabase,
    targets: &SampleTargets,
    rng: &mut R,
) -> Result<ObjdetSample<C>, AugmentError> {
    let ObjdetSample {
        mut points,
        mut boxes,
        calib,
    } = sample;
    let num_original = boxes.len();

    let mut sampled: Vec<&DonorBox> = Vec::new();
    for (class_name, &target) in targets {
        let pool = db
            .pool(class_name)
            .ok_or_else(|| AugmentError::MissingClass(class_name.clone()))?;

        let existing = boxes
            .iter()
            .filter(|b| b.label_class() == pool.label())
            .count();
        let needed = (SAMPLE_RATE * (target as f64 - existing as f64)).round() as i64;
        log::debug!(
            "class '{}': existing {}, target {}, sampling {}",
            class_name,
            existing,
            target,
            needed.max(0)
        );
        if needed < 0 {
            continue;
        }

        let sampled_cls = sample_class(pool, needed as usize, &boxes, rng);
        boxes.extend(sampled_cls.iter().map(|d| d.bbox().clone()));
        sampled.extend(sampled_cls);
    }

    if !sampled.is_empty() {
        let sampled_boxes = &boxes[num_original..];
        let mut merged: Vec<[f64; 3]> = sampled
            .iter()
            .flat_map(|d| d.points().iter().copied())
            .collect();
        merged.extend(remove_points_in_boxes(&points, sampled_boxes));
        points = merged;
    }

    Ok(ObjdetSample {
        points,
        boxes,
        calib,
    })
}
