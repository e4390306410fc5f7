mod common;
mod diff_tests;
mod synth_tests;
