//! CyberCar NFT contract bindings

use alloy::sol;

sol! {
    /// CyberCar capped-supply ERC721 with phased minting
    #[sol(rpc)]
    interface ICar {
        // ERC721 / ERC721Enumerable

        function name() external view returns (string memory);
        function symbol() external view returns (string memory);
        function totalSupply() external view returns (uint256);
        function balanceOf(address owner) external view returns (uint256);
        function ownerOf(uint256 tokenId) external view returns (address);
        function tokenURI(uint256 tokenId) external view returns (string memory);
        function tokenByIndex(uint256 index) external view returns (uint256);
        function tokenOfOwnerByIndex(address owner, uint256 index) external view returns (uint256);
        function getApproved(uint256 tokenId) external view returns (address);
        function isApprovedForAll(address owner, address operator) external view returns (bool);
        function supportsInterface(bytes4 interfaceId) external view returns (bool);

        function approve(address to, uint256 tokenId) external;
        function setApprovalForAll(address operator, bool approved) external;
        function transferFrom(address from, address to, uint256 tokenId) external;

        // Ownable / Pausable

        function owner() external view returns (address);
        function paused() external view returns (bool);
        function transferOwnership(address newOwner) external;
        function renounceOwnership() external;
        function pause() external;
        function unpause() external;

        // Minting lifecycle

        /// 0 = closed, 1 = whitelist, 2 = public
        function phase() external view returns (int8);
        function capacity() external view returns (uint256);
        function reserved() external view returns (uint256);
        function whitelistCap() external view returns (uint256);
        function mintPrice() external view returns (uint256);
        function version() external view returns (string memory);

        function mintQuota(address addr) external view returns (uint8 minted, uint8 cap);
        function airdropQuota(address addr) external view returns (uint8 minted, uint8 cap);

        function setPhase(int8 newPhase) external;
        function addWhitelist(address[] calldata addrs, uint8 amount) external;
        function addAirdrop(address[] calldata addrs, uint8 amount) external;
        function addReserve(address[] calldata addrs, uint8 amount) external;

        function initialize() external;
        function mint(uint8 amount) external payable;
        function claim(uint8 amount) external;
        function reserve() external;
        function withdraw() external;

        // Events

        event Transfer(address indexed from, address indexed to, uint256 indexed tokenId);
        event Approval(address indexed owner, address indexed approved, uint256 indexed tokenId);
        event ApprovalForAll(address indexed owner, address indexed operator, bool approved);
        event OwnershipTransferred(address indexed previousOwner, address indexed newOwner);
        event Paused(address account);
        event Unpaused(address account);
    }
}
