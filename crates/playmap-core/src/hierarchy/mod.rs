pub mod cluster;
pub mod size;

pub use cluster::{dominant_classification, ClusterTier, DominantClassification, CLUSTER_PRIORITY};
pub use size::{
    bucket_by_label, bucket_index, classifications_in_range, is_size_included, SizeRange,
    SIZE_BUCKETS,
};
