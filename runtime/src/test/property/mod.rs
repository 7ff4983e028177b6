mod value_props;
