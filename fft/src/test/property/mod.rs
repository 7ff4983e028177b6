mod twiddle_props;
