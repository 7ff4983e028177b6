mod literal_props;
