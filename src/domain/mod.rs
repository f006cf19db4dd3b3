// Domain layer - Frame cost data and keyframe plans

pub mod model;
