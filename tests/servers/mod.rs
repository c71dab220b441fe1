mod peer;
mod scenario;
mod tracker;
