//! Pyth price-feed contract bindings.

use alloy::sol;

// Pyth upgradable receiver interface
sol! {
    #[sol(rpc)]
    interface IPyth {
        struct Price {
            int64 price;
            uint64 conf;
            int32 expo;
            uint publishTime;
        }

        struct PriceFeed {
            bytes32 id;
            Price price;
            Price emaPrice;
        }

        struct DataSource {
            uint16 chainId;
            bytes32 emitterAddress;
        }

        function validTimePeriodSeconds() external view returns (uint);
        function validDataSources() external view returns (DataSource[] memory);
        function governanceDataSource() external view returns (DataSource memory);
        function lastExecutedGovernanceSequence() external view returns (uint64);

        function singleUpdateFeeInWei() external view returns (uint);
        function getUpdateFee(bytes[] calldata updateData) external view returns (uint feeAmount);

        function priceFeedExists(bytes32 id) external view returns (bool);
        function queryPriceFeed(bytes32 id) external view returns (PriceFeed memory priceFeed);

        function updatePriceFeeds(bytes[] calldata updateData) external payable;
        function executeGovernanceInstruction(bytes calldata encodedVM) external;
    }
}
