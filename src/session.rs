pub(crate) mod poster;
