mod test_acquire_replaces_stream;
