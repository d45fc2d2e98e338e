//! Cross-module tests: octree structure properties and strategy scenarios
