mod client;

pub use client::GithubContents;
