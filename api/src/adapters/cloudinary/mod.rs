//! Cloudinary image CDN adapter

mod client;

pub use client::CloudinaryClient;
