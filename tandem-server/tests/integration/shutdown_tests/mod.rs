mod test_server_shutdown;
