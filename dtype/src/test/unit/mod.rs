mod qualifier;
