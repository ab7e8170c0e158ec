/*
 * Responsibility
 * - handler / middleware から使う service 群 (auth, storage, id codec, geo)
 */
pub mod auth;
pub mod geo;
pub mod id_codec;
pub mod storage;
