/*
 * Responsibility
 * - Public interface of the middleware layer (re-exports)
 */
pub mod http;
