pub mod test_layouts;
