pub(crate) mod recording;
