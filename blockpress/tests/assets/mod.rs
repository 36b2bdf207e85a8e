mod mirror;
