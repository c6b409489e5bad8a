mod port_validator_tests;
