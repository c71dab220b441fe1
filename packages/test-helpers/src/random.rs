use rand::distributions::Alphanumeric;
use rand::Rng as _;

/// Returns a random alphanumeric string of `size` characters.
#[must_use]
pub fn alphanumeric(size: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(size)
        .map(char::from)
        .collect()
}
