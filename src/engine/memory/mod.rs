mod sampler;


pub use sampler::{MemorySample, MemorySampler};
