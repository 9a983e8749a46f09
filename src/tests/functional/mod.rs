// Licensed under the Apache-2.0 license

pub mod probe_test;
