//! Abuse protection for the authentication and API surfaces

pub mod brute_force;
pub mod rate_limiter;

pub use brute_force::BruteForceProtector;
pub use rate_limiter::RateLimiter;
